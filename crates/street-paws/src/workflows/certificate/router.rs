use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Extension, Json, Router,
};

use super::assembler::Certificate;
use super::service::{CertificateError, CertificateService};
use crate::auth::SessionDirectory;
use crate::workflows::adoption::{AdoptionRepository, AdoptionRequestId};
use crate::workflows::http::{authenticate, ApiError};

pub fn certificate_router<R>(
    service: Arc<CertificateService<R>>,
    sessions: Arc<dyn SessionDirectory>,
) -> Router
where
    R: AdoptionRepository + 'static,
{
    Router::new()
        .route(
            "/adoption-requests/:id/certificate",
            get(certificate_handler::<R>),
        )
        .layer(Extension(sessions))
        .with_state(service)
}

pub(crate) async fn certificate_handler<R>(
    State(service): State<Arc<CertificateService<R>>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Certificate>, ApiError>
where
    R: AdoptionRepository + 'static,
{
    let session = authenticate(&headers, &sessions)?;
    let certificate = service.issue(&session, &AdoptionRequestId(request_id))?;
    Ok(Json(certificate))
}

impl From<CertificateError> for ApiError {
    fn from(error: CertificateError) -> Self {
        let message = error.to_string();
        match error {
            CertificateError::NotApproved { .. } => {
                ApiError::new(StatusCode::CONFLICT, "not_approved", message)
            }
            CertificateError::NotFound(_) | CertificateError::UnknownDog(_) => {
                ApiError::not_found(message)
            }
            CertificateError::IncompleteRecord(_) => ApiError::internal(message),
            CertificateError::Repository(error) => ApiError::from(error),
        }
    }
}
