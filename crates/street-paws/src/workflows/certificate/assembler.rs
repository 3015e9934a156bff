use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::StaffIdentity;
use crate::workflows::adoption::{
    AdopterProfile, AdoptionRecord, AdoptionRequestId, RequestStatus,
};
use crate::workflows::dogs::DogProfile;

/// Data printed on an adoption certificate. Rendering to a document happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub certificate_number: String,
    pub request_id: AdoptionRequestId,
    pub adopter: AdopterProfile,
    pub dog: DogProfile,
    pub approved_on: DateTime<Utc>,
    pub veterinarian: String,
    pub adoption_officer: String,
}

/// Stable certificate number for a request, e.g. `adr-000042` becomes `SPC-ADR-000042`.
pub fn certificate_number(request_id: &AdoptionRequestId) -> String {
    let suffix: String = request_id
        .0
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    format!("SPC-{suffix}")
}

pub fn assemble(
    record: &AdoptionRecord,
    dog: &DogProfile,
    vet: &StaffIdentity,
    officer: &StaffIdentity,
) -> Result<Certificate, AssemblyError> {
    if record.status != RequestStatus::Approved {
        return Err(AssemblyError::NotApproved(record.status));
    }
    if dog.id != record.dog_id {
        return Err(AssemblyError::DogMismatch);
    }
    let approved_on = record
        .decision
        .as_ref()
        .map(|decision| decision.decided_at)
        .ok_or(AssemblyError::MissingApprovalDate)?;

    Ok(Certificate {
        certificate_number: certificate_number(&record.id),
        request_id: record.id.clone(),
        adopter: record.adopter.clone(),
        dog: dog.clone(),
        approved_on,
        veterinarian: vet.name.clone(),
        adoption_officer: officer.name.clone(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("request is {0}; certificates are issued only for approved adoptions")]
    NotApproved(RequestStatus),
    #[error("dog profile does not match the adoption request")]
    DogMismatch,
    #[error("approved request has no recorded decision date")]
    MissingApprovalDate,
}
