use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{FollowUpReport, FollowUpReportId, FollowUpSubmission};
use super::repository::FollowUpRepository;
use super::summary::{compute_summary, FollowUpSummary};
use super::validation::screen_follow_up;
use crate::auth::{AccountId, Session};
use crate::clock::{Clock, SystemClock};
use crate::workflows::adoption::{
    AdoptionRecord, AdoptionRepository, AdoptionRequestId, RepositoryError, RequestStatus,
};
use crate::workflows::fields::FieldErrors;

/// Tracks the weekly reports owed by approved adoptions.
pub struct FollowUpTracker<R, F> {
    requests: Arc<R>,
    reports: Arc<F>,
    clock: Arc<dyn Clock>,
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> FollowUpReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    FollowUpReportId(format!("fur-{id:06}"))
}

impl<R, F> FollowUpTracker<R, F>
where
    R: AdoptionRepository + 'static,
    F: FollowUpRepository + 'static,
{
    pub fn new(requests: Arc<R>, reports: Arc<F>) -> Self {
        Self {
            requests,
            reports,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Record one week's report for the caller's approved adoption.
    pub fn submit(
        &self,
        owner: &AccountId,
        submission: FollowUpSubmission,
    ) -> Result<FollowUpReport, FollowUpError> {
        let request = self.fetch(&submission.adoption_request_id)?;
        if &request.owner != owner {
            return Err(FollowUpError::NotFound(request.id));
        }
        if request.status != RequestStatus::Approved {
            return Err(FollowUpError::PreconditionFailed {
                request_id: request.id,
                status: request.status,
            });
        }

        let summary = compute_summary(&self.reports.for_request(&request.id)?);
        if summary.is_complete() {
            return Err(FollowUpError::AlreadyComplete(request.id));
        }
        if let Some(week) = submission.week.filter(|week| summary.has_week(*week)) {
            return Err(FollowUpError::DuplicateWeek {
                request_id: request.id,
                week,
            });
        }

        let screened = match screen_follow_up(
            submission.week,
            &submission.form,
            &submission.photos,
            submission.vet_report.as_ref(),
        ) {
            Ok(screened) => screened,
            Err(mut errors) => {
                errors.extend(dog_mismatch(&request, &submission));
                return Err(FollowUpError::Validation(errors));
            }
        };
        dog_mismatch(&request, &submission).into_result(())?;

        let report = FollowUpReport {
            id: next_report_id(),
            adoption_request_id: request.id.clone(),
            dog_id: request.dog_id.clone(),
            week: screened.week,
            health_condition: screened.health_condition,
            feeding_status: screened.feeding_status,
            feeding_notes: screened.feeding_notes,
            behavior_checklist: screened.behavior_checklist,
            environment_check: screened.environment_check,
            notes: screened.notes,
            photos: submission.photos,
            vet_report: submission.vet_report,
            submitted_at: self.clock.now(),
        };

        let week = report.week;
        let stored = self.reports.insert(report).map_err(|error| match error {
            RepositoryError::Conflict => {
                warn!(request_id = %request.id, week, "concurrent duplicate follow-up");
                FollowUpError::DuplicateWeek {
                    request_id: request.id.clone(),
                    week,
                }
            }
            other => FollowUpError::Repository(other),
        })?;
        info!(
            request_id = %stored.adoption_request_id,
            report_id = %stored.id,
            week = stored.week,
            "follow-up report submitted"
        );
        Ok(stored)
    }

    /// Reports for a request ordered by week.
    pub fn list(
        &self,
        caller: &Session,
        request_id: &AdoptionRequestId,
    ) -> Result<Vec<FollowUpReport>, FollowUpError> {
        let request = self.visible(caller, request_id)?;
        let mut reports = self.reports.for_request(&request.id)?;
        reports.sort_by_key(|report| report.week);
        Ok(reports)
    }

    pub fn summary(
        &self,
        caller: &Session,
        request_id: &AdoptionRequestId,
    ) -> Result<FollowUpSummary, FollowUpError> {
        let request = self.visible(caller, request_id)?;
        Ok(compute_summary(&self.reports.for_request(&request.id)?))
    }

    fn fetch(&self, request_id: &AdoptionRequestId) -> Result<AdoptionRecord, FollowUpError> {
        self.requests
            .fetch(request_id)?
            .ok_or_else(|| FollowUpError::NotFound(request_id.clone()))
    }

    /// Owners see their own requests; staff see every request.
    fn visible(
        &self,
        caller: &Session,
        request_id: &AdoptionRequestId,
    ) -> Result<AdoptionRecord, FollowUpError> {
        let request = self.fetch(request_id)?;
        if request.owner != caller.account && !caller.role.is_staff() {
            return Err(FollowUpError::NotFound(request_id.clone()));
        }
        Ok(request)
    }
}

fn dog_mismatch(request: &AdoptionRecord, submission: &FollowUpSubmission) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(dog_id) = &submission.dog_id {
        if dog_id != &request.dog_id {
            errors.add("dog", format!("dog {dog_id} is not part of this adoption"));
        }
    }
    errors
}

/// Error raised by the follow-up tracker.
#[derive(Debug, thiserror::Error)]
pub enum FollowUpError {
    #[error("follow-ups open once request {request_id} is approved; it is {status}")]
    PreconditionFailed {
        request_id: AdoptionRequestId,
        status: RequestStatus,
    },
    #[error("all four follow-up reports for request {0} are already submitted")]
    AlreadyComplete(AdoptionRequestId),
    #[error("week {week} already has a report for request {request_id}")]
    DuplicateWeek {
        request_id: AdoptionRequestId,
        week: u8,
    },
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error("adoption request {0} not found")]
    NotFound(AdoptionRequestId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
