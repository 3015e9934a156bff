//! Adoption request intake, adopter edits, and staff review.

pub mod domain;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;


pub use domain::{
    AdopterForm, AdopterProfile, AdoptionRequestId, AdoptionRequestView, AdoptionSubmission,
    Decision, HomeType, OccupationStatus, RequestStatus, VetReview, VetReviewStatus,
};
pub use lifecycle::TransitionError;
pub use repository::{
    AdoptionRecord, AdoptionRepository, DashboardEvent, DashboardEventKind, DashboardNotifier,
    NotifyError, RepositoryError, ReviewStage,
};
pub use router::{adoption_router, DecisionPayload, VetReviewPayload};
pub use service::{AdoptionRequestService, AdoptionServiceError};
pub use validation::{screen_adopter, validate_adopter, validate_field, AdopterField};
