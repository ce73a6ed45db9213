use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let present = tokio::fs::try_exists(state.result_store.path())
        .await
        .unwrap_or(false);
    let body = json!({
        "status": "ok",
        "results_log": if present { "present" } else { "empty" },
    });
    (StatusCode::OK, Json(body))
}
