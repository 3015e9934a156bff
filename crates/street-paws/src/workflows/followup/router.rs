use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};

use super::domain::{Attachment, FollowUpForm, FollowUpReport, FollowUpSubmission};
use super::repository::FollowUpRepository;
use super::service::{FollowUpError, FollowUpTracker};
use super::summary::FollowUpSummary;
use crate::auth::SessionDirectory;
use crate::workflows::adoption::{AdoptionRepository, AdoptionRequestId};
use crate::workflows::dogs::DogId;
use crate::workflows::fields::FieldErrors;
use crate::workflows::http::{authenticate, ApiError};

/// Room for several full-size photos plus a vet report in one upload.
const UPLOAD_LIMIT_BYTES: usize = 64 * 1024 * 1024;

type SharedTracker<R, F> = Arc<FollowUpTracker<R, F>>;

/// Router for weekly report submission, listing, and summaries.
pub fn follow_up_router<R, F>(
    tracker: SharedTracker<R, F>,
    sessions: Arc<dyn SessionDirectory>,
) -> Router
where
    R: AdoptionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    Router::new()
        .route(
            "/follow-up-reports",
            post(submit_handler::<R, F>).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/follow-up-reports/:request_id", get(list_handler::<R, F>))
        .route(
            "/follow-up-reports/:request_id/summary",
            get(summary_handler::<R, F>),
        )
        .layer(Extension(sessions))
        .with_state(tracker)
}

pub(crate) async fn submit_handler<R, F>(
    State(tracker): State<SharedTracker<R, F>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ApiError>
where
    R: AdoptionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    let session = authenticate(&headers, &sessions)?;
    let submission = read_submission(multipart).await?;
    let report = tracker.submit(&session.account, submission)?;
    Ok((StatusCode::CREATED, Json(report)).into_response())
}

pub(crate) async fn list_handler<R, F>(
    State(tracker): State<SharedTracker<R, F>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<FollowUpReport>>, ApiError>
where
    R: AdoptionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    let session = authenticate(&headers, &sessions)?;
    let reports = tracker.list(&session, &AdoptionRequestId(request_id))?;
    Ok(Json(reports))
}

pub(crate) async fn summary_handler<R, F>(
    State(tracker): State<SharedTracker<R, F>>,
    Extension(sessions): Extension<Arc<dyn SessionDirectory>>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<FollowUpSummary>, ApiError>
where
    R: AdoptionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    let session = authenticate(&headers, &sessions)?;
    let summary = tracker.summary(&session, &AdoptionRequestId(request_id))?;
    Ok(Json(summary))
}

/// Collect the multipart form into a submission. Only attachment metadata is kept;
/// unknown parts are drained and ignored.
async fn read_submission(mut multipart: Multipart) -> Result<FollowUpSubmission, ApiError> {
    let mut request_id = None;
    let mut dog_id = None;
    let mut week = None;
    let mut form = FollowUpForm::default();
    let mut photos = Vec::new();
    let mut vet_report = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photos" | "photos[]" | "vetReport" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(malformed)?;
                let attachment = Attachment {
                    file_name,
                    content_type,
                    size_bytes: bytes.len() as u64,
                };
                if name == "vetReport" {
                    vet_report = Some(attachment);
                } else {
                    photos.push(attachment);
                }
            }
            _ => {
                let value = field.text().await.map_err(malformed)?;
                match name.as_str() {
                    "adoptionRequest" => request_id = Some(value.trim().to_string()),
                    "dog" => {
                        dog_id = Some(value.trim().to_string()).filter(|dog| !dog.is_empty())
                    }
                    "week" => week = Some(value),
                    "healthCondition" => form.health_condition = value,
                    "feedingStatus" => form.feeding_status = value,
                    "feedingNotes" => form.feeding_notes = value,
                    "behaviorChecklist" | "behaviorChecklist[]" => form.behavior_checklist.extend(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|item| !item.is_empty())
                            .map(str::to_string),
                    ),
                    "environmentCheck" => form.environment_check = value,
                    "notes" => form.notes = Some(value),
                    _ => {}
                }
            }
        }
    }

    let Some(request_id) = request_id.filter(|id| !id.is_empty()) else {
        let mut errors = FieldErrors::new();
        errors.add("adoptionRequest", "adoptionRequest is required");
        return Err(ApiError::validation(errors));
    };

    Ok(FollowUpSubmission {
        adoption_request_id: AdoptionRequestId(request_id),
        dog_id: dog_id.map(DogId),
        week: week.and_then(|raw| raw.trim().parse().ok()),
        form,
        photos,
        vet_report,
    })
}

fn malformed(error: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::new(
        StatusCode::BAD_REQUEST,
        "malformed_request",
        format!("could not read multipart body: {error}"),
    )
}

impl From<FollowUpError> for ApiError {
    fn from(error: FollowUpError) -> Self {
        let message = error.to_string();
        match error {
            FollowUpError::PreconditionFailed { .. } => {
                ApiError::new(StatusCode::PRECONDITION_FAILED, "precondition_failed", message)
            }
            FollowUpError::AlreadyComplete(_) => {
                ApiError::new(StatusCode::CONFLICT, "already_complete", message)
            }
            FollowUpError::DuplicateWeek { .. } => {
                ApiError::new(StatusCode::CONFLICT, "duplicate_week", message)
            }
            FollowUpError::Validation(fields) => ApiError::validation(fields),
            FollowUpError::NotFound(_) => ApiError::not_found(message),
            FollowUpError::Repository(error) => ApiError::from(error),
        }
    }
}
