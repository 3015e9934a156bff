use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    AdopterProfile, AdoptionRequestId, AdoptionRequestView, Decision, RequestStatus, VetReview,
    VetReviewStatus,
};
use crate::auth::AccountId;
use crate::workflows::dogs::DogId;

/// Stored adoption request with its review trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionRecord {
    pub id: AdoptionRequestId,
    pub dog_id: DogId,
    pub owner: AccountId,
    pub adopter: AdopterProfile,
    pub status: RequestStatus,
    pub vet_review: VetReview,
    pub decision: Option<Decision>,
    pub created_at: DateTime<Utc>,
}

impl AdoptionRecord {
    /// Open or approved requests keep the dog off the market.
    pub fn holds_dog(&self) -> bool {
        matches!(self.status, RequestStatus::Pending | RequestStatus::Approved)
    }

    pub fn stage(&self) -> ReviewStage {
        ReviewStage {
            status: self.status,
            vet_review: self.vet_review.status,
        }
    }

    pub fn view(&self) -> AdoptionRequestView {
        AdoptionRequestView {
            id: self.id.clone(),
            dog_id: self.dog_id.clone(),
            owner: self.owner.clone(),
            adopter: self.adopter.clone(),
            request_status: self.status,
            vet_review_status: self.vet_review.status,
            created_at: self.created_at,
            decided_at: self.decision.as_ref().map(|decision| decision.decided_at),
            decision_note: self
                .decision
                .as_ref()
                .and_then(|decision| decision.note.clone()),
        }
    }
}

/// Review position a conditional write expects to find in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewStage {
    pub status: RequestStatus,
    pub vet_review: VetReviewStatus,
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations apply each check under the same lock as the write:
/// `insert` answers [`RepositoryError::Conflict`] while another record holds the dog,
/// and the `_if` writes answer it when the stored [`ReviewStage`] moved on.
pub trait AdoptionRepository: Send + Sync {
    fn insert(&self, record: AdoptionRecord) -> Result<AdoptionRecord, RepositoryError>;
    fn update_if(
        &self,
        record: AdoptionRecord,
        expected: ReviewStage,
    ) -> Result<(), RepositoryError>;
    fn remove_if(
        &self,
        id: &AdoptionRequestId,
        expected: ReviewStage,
    ) -> Result<AdoptionRecord, RepositoryError>;
    fn fetch(&self, id: &AdoptionRequestId) -> Result<Option<AdoptionRecord>, RepositoryError>;
    fn by_owner(&self, owner: &AccountId) -> Result<Vec<AdoptionRecord>, RepositoryError>;
    fn by_dog(&self, dog_id: &DogId) -> Result<Vec<AdoptionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook so open dashboards can refresh after a change.
pub trait DashboardNotifier: Send + Sync {
    fn publish(&self, event: DashboardEvent) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardEventKind {
    RequestSubmitted,
    RequestUpdated,
    RequestWithdrawn,
    VetReviewRecorded,
    RequestDecided,
}

/// Change notification carrying just enough to know which views to re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardEvent {
    pub kind: DashboardEventKind,
    pub request_id: AdoptionRequestId,
    pub dog_id: DogId,
    pub owner: AccountId,
}

impl DashboardEvent {
    pub fn for_record(kind: DashboardEventKind, record: &AdoptionRecord) -> Self {
        Self {
            kind,
            request_id: record.id.clone(),
            dog_id: record.dog_id.clone(),
            owner: record.owner.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("dashboard channel unavailable: {0}")]
    Transport(String),
}
