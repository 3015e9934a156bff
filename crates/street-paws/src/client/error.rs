use reqwest::StatusCode;

use crate::workflows::fields::FieldErrors;
use crate::workflows::http::ErrorBody;

/// Failure of a shelter API call, mirrored from the server's error codes.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    PreconditionFailed(String),
    #[error("{0}")]
    DuplicateWeek(String),
    #[error("{0}")]
    AlreadyComplete(String),
    #[error("{0}")]
    NotApproved(String),
    #[error("{0}")]
    DogUnavailable(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("sign in to continue")]
    Unauthenticated,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server responded {status}: {message}")]
    Server { status: u16, message: String },
    #[error("client misconfigured: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Map a non-2xx response onto the error taxonomy using the `code` field.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let Ok(envelope) = serde_json::from_str::<ErrorBody>(body) else {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body.trim().to_string()
            };
            return match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthenticated,
                _ => ClientError::Server {
                    status: status.as_u16(),
                    message,
                },
            };
        };

        let message = envelope.error;
        match envelope.code.as_str() {
            "validation" => ClientError::Validation(envelope.fields.unwrap_or_default()),
            "invalid_state" => ClientError::InvalidState(message),
            "invalid_transition" => ClientError::InvalidTransition(message),
            "precondition_failed" => ClientError::PreconditionFailed(message),
            "duplicate_week" => ClientError::DuplicateWeek(message),
            "already_complete" => ClientError::AlreadyComplete(message),
            "not_approved" => ClientError::NotApproved(message),
            "dog_unavailable" => ClientError::DogUnavailable(message),
            "not_found" => ClientError::NotFound(message),
            "forbidden" => ClientError::Forbidden(message),
            "conflict" => ClientError::Conflict(message),
            "unauthenticated" => ClientError::Unauthenticated,
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}
