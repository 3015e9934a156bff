use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{AccountId, StaffIdentity};
use crate::workflows::dogs::DogId;

/// Identifier wrapper for adoption requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdoptionRequestId(pub String);

impl fmt::Display for AdoptionRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Adopter-entered fields exactly as submitted by the form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdopterForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub occupation_status: String,
    pub home_type: String,
    pub has_other_pets: bool,
    pub agreed_to_care: bool,
}

/// Body of `POST /adoption-requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionSubmission {
    pub dog_id: DogId,
    #[serde(flatten)]
    pub adopter: AdopterForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OccupationStatus {
    Student,
    Employed,
    SelfEmployed,
    Retired,
    Other,
}

impl OccupationStatus {
    pub const ALL: [OccupationStatus; 5] = [
        OccupationStatus::Student,
        OccupationStatus::Employed,
        OccupationStatus::SelfEmployed,
        OccupationStatus::Retired,
        OccupationStatus::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            OccupationStatus::Student => "student",
            OccupationStatus::Employed => "employed",
            OccupationStatus::SelfEmployed => "self-employed",
            OccupationStatus::Retired => "retired",
            OccupationStatus::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HomeType {
    Apartment,
    House,
    Farm,
    Other,
}

impl HomeType {
    pub const ALL: [HomeType; 4] = [
        HomeType::Apartment,
        HomeType::House,
        HomeType::Farm,
        HomeType::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            HomeType::Apartment => "apartment",
            HomeType::House => "house",
            HomeType::Farm => "farm",
            HomeType::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|home| home.label().eq_ignore_ascii_case(raw))
    }
}

/// Validated, trimmed adopter details stored on a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdopterProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub occupation_status: OccupationStatus,
    pub home_type: HomeType,
    pub has_other_pets: bool,
    pub agreed_to_care: bool,
}

/// Outcome of the adoption request itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Medical fitness sign-off that gates the final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VetReviewStatus {
    Pending,
    Cleared,
    Rejected,
}

impl VetReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VetReviewStatus::Pending => "pending",
            VetReviewStatus::Cleared => "cleared",
            VetReviewStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VetReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VetReview {
    pub status: VetReviewStatus,
    pub reviewer: Option<StaffIdentity>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl VetReview {
    pub fn pending() -> Self {
        Self {
            status: VetReviewStatus::Pending,
            reviewer: None,
            reviewed_at: None,
        }
    }
}

/// Officer decision recorded when the request leaves `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub officer: StaffIdentity,
    pub decided_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Owner-facing snapshot returned by the adoption endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionRequestView {
    pub id: AdoptionRequestId,
    pub dog_id: DogId,
    pub owner: AccountId,
    pub adopter: AdopterProfile,
    pub request_status: RequestStatus,
    pub vet_review_status: VetReviewStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_note: Option<String>,
}
