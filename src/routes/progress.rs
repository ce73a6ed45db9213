use axum::{extract::State, response::Json};

use crate::dto::progress_dto::{AttemptListResponse, ProgressResponse};
use crate::error::{Error, Result};
use crate::models::attempt_record::AttemptRecord;
use crate::services::progress_service::ProgressService;
use crate::AppState;

/// `None` when nothing has been recorded yet.
async fn load_history(state: &AppState) -> Result<Option<Vec<AttemptRecord>>> {
    let store = state.result_store.clone();
    match tokio::task::spawn_blocking(move || store.load_all()).await? {
        Ok(records) => Ok(Some(records)),
        Err(Error::StoreNotFound) => {
            tracing::info!("No quiz results recorded yet");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[axum::debug_handler]
pub async fn get_progress(State(state): State<AppState>) -> Result<Json<ProgressResponse>> {
    let response = match load_history(&state).await? {
        Some(records) => ProgressResponse::from_report(ProgressService::aggregate(&records)),
        None => ProgressResponse::empty(),
    };
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn list_attempts(State(state): State<AppState>) -> Result<Json<AttemptListResponse>> {
    let attempts = load_history(&state).await?.unwrap_or_default();
    Ok(Json(AttemptListResponse {
        total: attempts.len(),
        attempts,
    }))
}
