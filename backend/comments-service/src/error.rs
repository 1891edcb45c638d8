/// Error types for the comments service
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for comments-service operations
pub type Result<T> = std::result::Result<T, CommentsError>;

#[derive(Debug, Error)]
pub enum CommentsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    /// The moderation worker is gone; nothing can be admitted
    #[error("Moderation queue closed")]
    QueueClosed,
}

impl ResponseError for CommentsError {
    fn status_code(&self) -> StatusCode {
        match self {
            CommentsError::Validation(_) => StatusCode::BAD_REQUEST,
            CommentsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CommentsError::QueueClosed => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for CommentsError {
    fn from(err: sqlx::Error) -> Self {
        CommentsError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CommentsError {
    fn from(err: validator::ValidationErrors) -> Self {
        CommentsError::Validation(err.to_string())
    }
}
