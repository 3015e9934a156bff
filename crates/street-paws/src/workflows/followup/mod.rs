//! Weekly follow-up reports owed by approved adoptions.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod summary;
pub mod validation;


pub use domain::{
    Attachment, Behavior, FeedingStatus, FollowUpForm, FollowUpReport, FollowUpReportId,
    FollowUpSubmission, HealthCondition, REQUIRED_WEEKS,
};
pub use repository::FollowUpRepository;
pub use router::follow_up_router;
pub use service::{FollowUpError, FollowUpTracker};
pub use summary::{compute_summary, FollowUpSummary};
pub use validation::{screen_follow_up, ScreenedFollowUp, MAX_PHOTO_BYTES, MAX_VET_REPORT_BYTES};
