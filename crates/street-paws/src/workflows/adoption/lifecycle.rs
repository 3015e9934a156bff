use super::domain::{RequestStatus, VetReviewStatus};

/// Reasons a requested status change is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("request is already {from} and cannot move to {to}")]
    Terminal {
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error("request cannot be decided while the vet review is pending")]
    VetReviewPending,
    #[error("request cannot be approved after the vet review was rejected")]
    VetReviewRejected,
    #[error("a decision must move the request out of pending")]
    NotADecision,
    #[error("vet review is already {current}")]
    VetReviewRecorded { current: VetReviewStatus },
    #[error("a vet review must clear or reject the request")]
    NotAReview,
}

/// Apply an officer decision to the request status.
///
/// Only `Pending -> Approved` and `Pending -> Rejected` exist. Approval needs a cleared vet
/// review; rejection only needs the review to have happened.
pub fn decide(
    current: RequestStatus,
    target: RequestStatus,
    vet_review: VetReviewStatus,
) -> Result<RequestStatus, TransitionError> {
    if current.is_terminal() {
        return Err(TransitionError::Terminal {
            from: current,
            to: target,
        });
    }
    if target == RequestStatus::Pending {
        return Err(TransitionError::NotADecision);
    }

    match (target, vet_review) {
        (_, VetReviewStatus::Pending) => Err(TransitionError::VetReviewPending),
        (RequestStatus::Approved, VetReviewStatus::Rejected) => {
            Err(TransitionError::VetReviewRejected)
        }
        _ => Ok(target),
    }
}

/// Record the vet's outcome; the review can only be given once, while the request is open.
pub fn review(
    request: RequestStatus,
    current: VetReviewStatus,
    outcome: VetReviewStatus,
) -> Result<VetReviewStatus, TransitionError> {
    if request.is_terminal() {
        return Err(TransitionError::Terminal {
            from: request,
            to: request,
        });
    }
    if current != VetReviewStatus::Pending {
        return Err(TransitionError::VetReviewRecorded { current });
    }
    if outcome == VetReviewStatus::Pending {
        return Err(TransitionError::NotAReview);
    }
    Ok(outcome)
}
