//! JSON error envelope and authentication helpers shared by the workflow routers.

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::fields::FieldErrors;
use crate::auth::{bearer_token, Role, Session, SessionDirectory};

/// Wire representation of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// Error returned from handlers; carries the status code and machine-readable code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                code: code.to_string(),
                fields: None,
            },
        }
    }

    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody {
                error: fields.to_string(),
                code: "validation".to_string(),
                fields: Some(fields),
            },
        }
    }

    pub fn unauthenticated() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "a valid bearer token is required",
        )
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Resolve the caller from the bearer token or fail with 401.
pub fn authenticate(
    headers: &HeaderMap,
    sessions: &Arc<dyn SessionDirectory>,
) -> Result<Session, ApiError> {
    let token = bearer_token(headers).ok_or_else(ApiError::unauthenticated)?;
    sessions.resolve(token).ok_or_else(ApiError::unauthenticated)
}

/// Resolve the caller and require the given staff role.
pub fn authenticate_role(
    headers: &HeaderMap,
    sessions: &Arc<dyn SessionDirectory>,
    role: Role,
) -> Result<Session, ApiError> {
    let session = authenticate(headers, sessions)?;
    if session.role != role {
        return Err(ApiError::forbidden(format!(
            "this action requires the {role:?} role"
        )));
    }
    Ok(session)
}
