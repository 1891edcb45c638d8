/// Error types for the news gateway
///
/// Downstream failures are collapsed into a small client-facing taxonomy.
/// Messages never name the collaborator that failed.
use crate::clients::ClientError;
use crate::moderation::RejectReason;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or malformed client input; no downstream call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// A collaborator was unreachable, timed out or answered with an error status
    #[error("Service temporarily unavailable")]
    Unavailable,

    /// A collaborator answered with a body that could not be decoded
    #[error("Malformed upstream response")]
    Decode,

    /// The moderation gate refused the text; nothing was written
    #[error("{0}")]
    PolicyRejection(RejectReason),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Detail is for logs only
    #[error("Internal error")]
    Internal(String),
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) | GatewayError::PolicyRejection(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Decode | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
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

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(_) | ClientError::Timeout | ClientError::Status(_) => {
                GatewayError::Unavailable
            }
            ClientError::Decode(_) => GatewayError::Decode,
            ClientError::NotFound => GatewayError::NotFound("news item".to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for GatewayError {
    fn from(err: validator::ValidationErrors) -> Self {
        GatewayError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_collapse() {
        assert!(matches!(
            GatewayError::from(ClientError::Timeout),
            GatewayError::Unavailable
        ));
        assert!(matches!(
            GatewayError::from(ClientError::Status(502)),
            GatewayError::Unavailable
        ));
        assert!(matches!(
            GatewayError::from(ClientError::Decode("eof".into())),
            GatewayError::Decode
        ));
        assert!(matches!(
            GatewayError::from(ClientError::NotFound),
            GatewayError::NotFound(_)
        ));
    }

    #[test]
    fn test_unavailable_message_is_generic() {
        let err = GatewayError::from(ClientError::Transport(
            "connection refused: comments-service:8081".into(),
        ));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!err.to_string().contains("comments"));
    }
}
