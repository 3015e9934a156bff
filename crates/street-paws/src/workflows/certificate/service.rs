use std::sync::Arc;

use tracing::info;

use super::assembler::{assemble, AssemblyError, Certificate};
use crate::auth::Session;
use crate::workflows::adoption::{
    AdoptionRepository, AdoptionRequestId, RepositoryError, RequestStatus,
};
use crate::workflows::dogs::{DogDirectory, DogId};

/// Issues certificates for approved requests visible to the caller.
pub struct CertificateService<R> {
    repository: Arc<R>,
    dogs: Arc<dyn DogDirectory>,
}

impl<R> CertificateService<R>
where
    R: AdoptionRepository + 'static,
{
    pub fn new(repository: Arc<R>, dogs: Arc<dyn DogDirectory>) -> Self {
        Self { repository, dogs }
    }

    pub fn issue(
        &self,
        caller: &Session,
        request_id: &AdoptionRequestId,
    ) -> Result<Certificate, CertificateError> {
        let record = self
            .repository
            .fetch(request_id)?
            .filter(|record| record.owner == caller.account || caller.role.is_staff())
            .ok_or_else(|| CertificateError::NotFound(request_id.clone()))?;
        if record.status != RequestStatus::Approved {
            return Err(CertificateError::NotApproved {
                request_id: record.id,
                status: record.status,
            });
        }

        let vet = record
            .vet_review
            .reviewer
            .clone()
            .ok_or(CertificateError::IncompleteRecord("vet reviewer"))?;
        let officer = record
            .decision
            .as_ref()
            .map(|decision| decision.officer.clone())
            .ok_or(CertificateError::IncompleteRecord("approving officer"))?;
        let dog = self
            .dogs
            .find(&record.dog_id)
            .ok_or_else(|| CertificateError::UnknownDog(record.dog_id.clone()))?;

        let certificate = assemble(&record, &dog, &vet, &officer).map_err(|error| match error {
            AssemblyError::NotApproved(status) => CertificateError::NotApproved {
                request_id: record.id.clone(),
                status,
            },
            AssemblyError::DogMismatch => CertificateError::IncompleteRecord("dog profile"),
            AssemblyError::MissingApprovalDate => CertificateError::IncompleteRecord("approval date"),
        })?;
        info!(
            request_id = %record.id,
            certificate = %certificate.certificate_number,
            "adoption certificate issued"
        );
        Ok(certificate)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    #[error("request {request_id} is {status}; certificates are issued only once approved")]
    NotApproved {
        request_id: AdoptionRequestId,
        status: RequestStatus,
    },
    #[error("approved request is missing its {0}")]
    IncompleteRecord(&'static str),
    #[error("adoption request {0} not found")]
    NotFound(AdoptionRequestId),
    #[error("dog {0} is no longer listed")]
    UnknownDog(DogId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
