use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::domain::{
    AdopterForm, AdoptionRequestId, AdoptionRequestView, AdoptionSubmission, RequestStatus,
    VetReviewStatus,
};
use super::repository::{AdoptionRepository, DashboardNotifier, RepositoryError};
use super::service::{AdoptionRequestService, AdoptionServiceError};
use crate::auth::{Role, SessionDirectory};
use crate::workflows::http::{authenticate, authenticate_role, ApiError};

/// Body of `POST /adoption-requests/{id}/vet-review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VetReviewPayload {
    pub outcome: VetReviewStatus,
}

/// Body of `POST /adoption-requests/{id}/decision`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPayload {
    pub status: RequestStatus,
    #[serde(default)]
    pub note: Option<String>,
}

type SharedService<R, N> = Arc<AdoptionRequestService<R, N>>;

/// Router exposing adopter submission/edit/withdraw and the staff review endpoints.
pub fn adoption_router<R, N>(
    service: SharedService<R, N>,
    sessions: Arc<dyn SessionDirectory>,
) -> Router
where
    R: AdoptionRepository + 'static,
    N: DashboardNotifier + 'static,
{
    Router::new()
        .route("/adoption-requests", post(submit_handler::<R, N>))
        .route("/adoption-requests/mine", get(mine_handler::<R, N>))
        .route(
            "/adoption-requests/:id",
            put(edit_handler::<R, N>).delete(withdraw_handler::<R, N>),
        )
        .route(
            "/adoption-requests/:id/vet-review",
            post(vet_review_handler::<R, N>),
        )
        .route(
            "/adoption-requests/:id/decision",
            post(decision_handler::<R, N>),
        )
        .layer(Extension(sessions))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    headers: HeaderMap,
    Json(submission): Json<AdoptionSubmission>,
) -> Result<Response, ApiError>
where
    R: AdoptionRepository + 'static,
    N: DashboardNotifier + 'static,
{
    let session = authenticate(&headers, &sessions)?;
    let record = service.submit(&session.account, submission)?;
    Ok((StatusCode::CREATED, Json(record.view())).into_response())
}

pub(crate) async fn mine_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdoptionRequestView>>, ApiError>
where
    R: AdoptionRepository + 'static,
    N: DashboardNotifier + 'static,
{
    let session = authenticate(&headers, &sessions)?;
    let records = service.get_mine(&session.account)?;
    Ok(Json(records.iter().map(|record| record.view()).collect()))
}

pub(crate) async fn edit_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
    Json(form): Json<AdopterForm>,
) -> Result<Json<AdoptionRequestView>, ApiError>
where
    R: AdoptionRepository + 'static,
    N: DashboardNotifier + 'static,
{
    let session = authenticate(&headers, &sessions)?;
    let record =
        service.edit_adopter_info(&session.account, &AdoptionRequestId(request_id), &form)?;
    Ok(Json(record.view()))
}

pub(crate) async fn withdraw_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError>
where
    R: AdoptionRepository + 'static,
    N: DashboardNotifier + 'static,
{
    let session = authenticate(&headers, &sessions)?;
    service.withdraw(&session.account, &AdoptionRequestId(request_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn vet_review_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<VetReviewPayload>,
) -> Result<Json<AdoptionRequestView>, ApiError>
where
    R: AdoptionRepository + 'static,
    N: DashboardNotifier + 'static,
{
    let session = authenticate_role(&headers, &sessions, Role::Veterinarian)?;
    let record = service.record_vet_review(
        &AdoptionRequestId(request_id),
        payload.outcome,
        session.staff_identity(),
    )?;
    Ok(Json(record.view()))
}

pub(crate) async fn decision_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<DecisionPayload>,
) -> Result<Json<AdoptionRequestView>, ApiError>
where
    R: AdoptionRepository + 'static,
    N: DashboardNotifier + 'static,
{
    let session = authenticate_role(&headers, &sessions, Role::Officer)?;
    let record = service.decide(
        &AdoptionRequestId(request_id),
        payload.status,
        session.staff_identity(),
        payload.note,
    )?;
    Ok(Json(record.view()))
}

impl From<AdoptionServiceError> for ApiError {
    fn from(error: AdoptionServiceError) -> Self {
        let message = error.to_string();
        match error {
            AdoptionServiceError::Validation(fields) => ApiError::validation(fields),
            AdoptionServiceError::InvalidState { .. } => {
                ApiError::new(StatusCode::CONFLICT, "invalid_state", message)
            }
            AdoptionServiceError::InvalidTransition(_) => {
                ApiError::new(StatusCode::CONFLICT, "invalid_transition", message)
            }
            AdoptionServiceError::NotFound(_) | AdoptionServiceError::UnknownDog(_) => {
                ApiError::not_found(message)
            }
            AdoptionServiceError::DogUnavailable(_) => {
                ApiError::new(StatusCode::CONFLICT, "dog_unavailable", message)
            }
            AdoptionServiceError::Repository(error) => ApiError::from(error),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Conflict => {
                ApiError::new(StatusCode::CONFLICT, "conflict", error.to_string())
            }
            RepositoryError::NotFound => ApiError::not_found(error.to_string()),
            RepositoryError::Unavailable(_) => ApiError::internal(error.to_string()),
        }
    }
}
