use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid quiz: {0}")]
    InvalidQuiz(String),

    #[error("Result store error: {0}")]
    StoreIo(String),

    #[error("No quiz attempts have been recorded yet")]
    StoreNotFound,

    #[error("Content generation failed: {0}")]
    ContentGeneration(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller may simply retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StoreIo(_) | Error::ContentGeneration(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let retryable = self.is_retryable();
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::InvalidQuiz(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("{}. Try generating a new quiz.", msg),
            ),
            Error::StoreIo(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Could not access quiz results, please retry: {}", msg),
            ),
            Error::StoreNotFound => (
                StatusCode::NOT_FOUND,
                "No quiz attempts yet. Take some quizzes first!".to_string(),
            ),
            Error::ContentGeneration(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Error generating content, please try again: {}", msg),
            ),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Config(msg) | Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        if status.is_server_error() {
            tracing::error!(status = %status, "{}", error_message);
        } else {
            tracing::warn!(status = %status, "{}", error_message);
        }

        let body = Json(json!({ "error": error_message, "retryable": retryable }));
        (status, body).into_response()
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StoreIo(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::StoreIo(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::ContentGeneration(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("Background task failed: {}", err))
    }
}
