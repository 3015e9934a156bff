use super::domain::FollowUpReport;
use crate::workflows::adoption::{AdoptionRequestId, RepositoryError};

/// Append-only storage for weekly reports.
///
/// `insert` must refuse a second report for the same request and week with
/// [`RepositoryError::Conflict`], so concurrent submissions cannot both land.
pub trait FollowUpRepository: Send + Sync {
    fn insert(&self, report: FollowUpReport) -> Result<FollowUpReport, RepositoryError>;
    fn for_request(
        &self,
        request_id: &AdoptionRequestId,
    ) -> Result<Vec<FollowUpReport>, RepositoryError>;
}
