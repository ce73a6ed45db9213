pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    ai_service::{AIService, QuizContentProvider},
    result_store::ResultStore,
    session_service::SessionService,
};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub content_provider: Arc<dyn QuizContentProvider>,
    pub result_store: ResultStore,
    pub session_service: SessionService,
}

impl AppState {
    pub fn new(config: &Config) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| error::Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let ai_service = AIService::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_api_base.clone(),
            config.shuffle_options,
            http_client,
        );

        let mut state = Self::from_parts(
            Arc::new(ai_service),
            ResultStore::new(config.results_path.clone()),
        );
        state.session_service =
            SessionService::new(chrono::Duration::minutes(config.session_ttl_minutes));
        Ok(state)
    }

    pub fn from_parts(
        content_provider: Arc<dyn QuizContentProvider>,
        result_store: ResultStore,
    ) -> Self {
        Self {
            content_provider,
            result_store,
            session_service: SessionService::default(),
        }
    }
}
