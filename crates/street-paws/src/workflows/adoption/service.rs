use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    AdopterForm, AdoptionRequestId, AdoptionSubmission, Decision, RequestStatus, VetReview,
    VetReviewStatus,
};
use super::lifecycle::{self, TransitionError};
use super::repository::{
    AdoptionRecord, AdoptionRepository, DashboardEvent, DashboardEventKind, DashboardNotifier,
    RepositoryError,
};
use super::validation::screen_adopter;
use crate::auth::{AccountId, StaffIdentity};
use crate::clock::{Clock, SystemClock};
use crate::workflows::dogs::{DogDirectory, DogId};
use crate::workflows::fields::FieldErrors;

/// Service owning adoption request submission, adopter edits, and staff review.
pub struct AdoptionRequestService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    dogs: Arc<dyn DogDirectory>,
    clock: Arc<dyn Clock>,
}

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> AdoptionRequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AdoptionRequestId(format!("adr-{id:06}"))
}

impl<R, N> AdoptionRequestService<R, N>
where
    R: AdoptionRepository + 'static,
    N: DashboardNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, dogs: Arc<dyn DogDirectory>) -> Self {
        Self {
            repository,
            notifier,
            dogs,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Validate and store a new request in `Pending`/`Pending`.
    pub fn submit(
        &self,
        owner: &AccountId,
        submission: AdoptionSubmission,
    ) -> Result<AdoptionRecord, AdoptionServiceError> {
        let adopter = screen_adopter(&submission.adopter)?;

        let dog_id = submission.dog_id;
        if self.dogs.find(&dog_id).is_none() {
            return Err(AdoptionServiceError::UnknownDog(dog_id));
        }

        let record = AdoptionRecord {
            id: next_request_id(),
            dog_id: dog_id.clone(),
            owner: owner.clone(),
            adopter,
            status: RequestStatus::Pending,
            vet_review: VetReview::pending(),
            decision: None,
            created_at: self.clock.now(),
        };

        let stored = match self.repository.insert(record) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => {
                warn!(%dog_id, "dog already held by another request");
                return Err(AdoptionServiceError::DogUnavailable(dog_id));
            }
            Err(error) => return Err(error.into()),
        };
        info!(request_id = %stored.id, dog_id = %stored.dog_id, "adoption request submitted");
        self.notify(DashboardEventKind::RequestSubmitted, &stored);
        Ok(stored)
    }

    /// Delete a request that is still pending.
    pub fn withdraw(
        &self,
        owner: &AccountId,
        request_id: &AdoptionRequestId,
    ) -> Result<AdoptionRecord, AdoptionServiceError> {
        let record = self.owned(owner, request_id)?;
        ensure_pending(&record, "withdrawn")?;

        let removed = self
            .repository
            .remove_if(request_id, record.stage())
            .map_err(|error| self.stale(request_id, error, "withdrawn"))?;
        info!(request_id = %removed.id, "adoption request withdrawn");
        self.notify(DashboardEventKind::RequestWithdrawn, &removed);
        Ok(removed)
    }

    /// Replace the adopter details of a pending request after re-validating them.
    pub fn edit_adopter_info(
        &self,
        owner: &AccountId,
        request_id: &AdoptionRequestId,
        form: &AdopterForm,
    ) -> Result<AdoptionRecord, AdoptionServiceError> {
        let mut record = self.owned(owner, request_id)?;
        ensure_pending(&record, "edited")?;

        let expected = record.stage();
        record.adopter = screen_adopter(form)?;
        self.repository
            .update_if(record.clone(), expected)
            .map_err(|error| self.stale(request_id, error, "edited"))?;
        self.notify(DashboardEventKind::RequestUpdated, &record);
        Ok(record)
    }

    /// All requests owned by the caller, newest first.
    pub fn get_mine(&self, owner: &AccountId) -> Result<Vec<AdoptionRecord>, AdoptionServiceError> {
        let mut records = self.repository.by_owner(owner)?;
        records.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(records)
    }

    /// Fetch a request on behalf of its owner; other adopters see it as missing.
    pub fn get(
        &self,
        owner: &AccountId,
        request_id: &AdoptionRequestId,
    ) -> Result<AdoptionRecord, AdoptionServiceError> {
        self.owned(owner, request_id)
    }

    /// Staff: record the vet's medical clearance or rejection.
    pub fn record_vet_review(
        &self,
        request_id: &AdoptionRequestId,
        outcome: VetReviewStatus,
        reviewer: StaffIdentity,
    ) -> Result<AdoptionRecord, AdoptionServiceError> {
        let mut record = self.fetch(request_id)?;
        let expected = record.stage();
        let status = lifecycle::review(record.status, record.vet_review.status, outcome)
            .map_err(|error| self.refused(&record, error))?;

        record.vet_review = VetReview {
            status,
            reviewer: Some(reviewer),
            reviewed_at: Some(self.clock.now()),
        };
        self.repository
            .update_if(record.clone(), expected)
            .map_err(|error| self.stale(request_id, error, "reviewed"))?;
        info!(request_id = %record.id, outcome = status.label(), "vet review recorded");
        self.notify(DashboardEventKind::VetReviewRecorded, &record);
        Ok(record)
    }

    /// Staff: approve or reject a reviewed request.
    pub fn decide(
        &self,
        request_id: &AdoptionRequestId,
        target: RequestStatus,
        officer: StaffIdentity,
        note: Option<String>,
    ) -> Result<AdoptionRecord, AdoptionServiceError> {
        let mut record = self.fetch(request_id)?;
        let expected = record.stage();
        let status = lifecycle::decide(record.status, target, record.vet_review.status)
            .map_err(|error| self.refused(&record, error))?;

        record.status = status;
        record.decision = Some(Decision {
            officer,
            decided_at: self.clock.now(),
            note: note.filter(|note| !note.trim().is_empty()),
        });
        self.repository
            .update_if(record.clone(), expected)
            .map_err(|error| self.stale(request_id, error, "decided"))?;
        info!(request_id = %record.id, status = status.label(), "adoption request decided");
        self.notify(DashboardEventKind::RequestDecided, &record);
        Ok(record)
    }

    fn fetch(&self, request_id: &AdoptionRequestId) -> Result<AdoptionRecord, AdoptionServiceError> {
        self.repository
            .fetch(request_id)?
            .ok_or_else(|| AdoptionServiceError::NotFound(request_id.clone()))
    }

    fn owned(
        &self,
        owner: &AccountId,
        request_id: &AdoptionRequestId,
    ) -> Result<AdoptionRecord, AdoptionServiceError> {
        let record = self.fetch(request_id)?;
        if &record.owner != owner {
            return Err(AdoptionServiceError::NotFound(request_id.clone()));
        }
        Ok(record)
    }

    /// A conditional write lost to a concurrent change; report the state that won.
    fn stale(
        &self,
        request_id: &AdoptionRequestId,
        error: RepositoryError,
        action: &'static str,
    ) -> AdoptionServiceError {
        if !matches!(error, RepositoryError::Conflict) {
            return error.into();
        }
        match self.fetch(request_id) {
            Ok(current) => {
                warn!(
                    request_id = %current.id,
                    status = current.status.label(),
                    action,
                    "write lost to a concurrent change"
                );
                AdoptionServiceError::InvalidState {
                    request_id: current.id,
                    status: current.status,
                    action,
                }
            }
            Err(error) => error,
        }
    }

    fn refused(&self, record: &AdoptionRecord, error: TransitionError) -> AdoptionServiceError {
        warn!(request_id = %record.id, %error, "status transition refused");
        AdoptionServiceError::InvalidTransition(error)
    }

    fn notify(&self, kind: DashboardEventKind, record: &AdoptionRecord) {
        if let Err(error) = self
            .notifier
            .publish(DashboardEvent::for_record(kind, record))
        {
            warn!(request_id = %record.id, %error, "dashboard notification dropped");
        }
    }
}

fn ensure_pending(record: &AdoptionRecord, action: &'static str) -> Result<(), AdoptionServiceError> {
    if record.status == RequestStatus::Pending {
        Ok(())
    } else {
        Err(AdoptionServiceError::InvalidState {
            request_id: record.id.clone(),
            status: record.status,
            action,
        })
    }
}

/// Error raised by the adoption request service.
#[derive(Debug, thiserror::Error)]
pub enum AdoptionServiceError {
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error("request {request_id} is {status} and can no longer be {action}")]
    InvalidState {
        request_id: AdoptionRequestId,
        status: RequestStatus,
        action: &'static str,
    },
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("adoption request {0} not found")]
    NotFound(AdoptionRequestId),
    #[error("dog {0} is not listed for adoption")]
    UnknownDog(DogId),
    #[error("dog {0} already has an open or approved adoption request")]
    DogUnavailable(DogId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
