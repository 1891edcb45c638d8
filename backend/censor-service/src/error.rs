/// Error types for the censor service
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CensorError>;

#[derive(Debug, Error)]
pub enum CensorError {
    /// Text contains a banned term
    #[error("Inappropriate content")]
    Inappropriate,

    /// Body was not a `{"text": ...}` JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl ResponseError for CensorError {
    fn status_code(&self) -> StatusCode {
        match self {
            CensorError::Inappropriate | CensorError::InvalidBody(_) => StatusCode::BAD_REQUEST,
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
