use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::adoption::AdoptionRequestId;
use crate::workflows::dogs::DogId;

/// Number of weekly reports every approved adoption owes.
pub const REQUIRED_WEEKS: u8 = 4;

/// Identifier wrapper for follow-up reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowUpReportId(pub String);

impl fmt::Display for FollowUpReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercased alphanumerics only, so `NeedsAttention`, `needs_attention`, and
/// `Needs Attention` compare equal.
fn normalized(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Adopter's assessment of the dog's health this week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCondition {
    Healthy,
    NeedsAttention,
    Critical,
}

impl HealthCondition {
    pub const ALL: [HealthCondition; 3] = [
        HealthCondition::Healthy,
        HealthCondition::NeedsAttention,
        HealthCondition::Critical,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            HealthCondition::Healthy => "healthy",
            HealthCondition::NeedsAttention => "needs_attention",
            HealthCondition::Critical => "critical",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = normalized(raw);
        Self::ALL
            .into_iter()
            .find(|candidate| normalized(candidate.label()) == wanted)
    }
}

impl fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingStatus {
    Regular,
    Irregular,
    SkippedMeals,
}

impl FeedingStatus {
    pub const ALL: [FeedingStatus; 3] = [
        FeedingStatus::Regular,
        FeedingStatus::Irregular,
        FeedingStatus::SkippedMeals,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FeedingStatus::Regular => "regular",
            FeedingStatus::Irregular => "irregular",
            FeedingStatus::SkippedMeals => "skipped_meals",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = normalized(raw);
        Self::ALL
            .into_iter()
            .find(|candidate| normalized(candidate.label()) == wanted)
    }
}

impl fmt::Display for FeedingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Behaviors observed during the week; a report ticks at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    Playful,
    Aggressive,
    Calm,
    Anxious,
}

impl Behavior {
    pub const ALL: [Behavior; 4] = [
        Behavior::Playful,
        Behavior::Aggressive,
        Behavior::Calm,
        Behavior::Anxious,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Behavior::Playful => "playful",
            Behavior::Aggressive => "aggressive",
            Behavior::Calm => "calm",
            Behavior::Anxious => "anxious",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = normalized(raw);
        Self::ALL
            .into_iter()
            .find(|candidate| normalized(candidate.label()) == wanted)
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metadata of an uploaded file; the bytes themselves go to media storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

impl Attachment {
    /// Declared content type, falling back to a guess from the file extension.
    pub fn effective_mime(&self) -> Option<mime::Mime> {
        let declared = self.content_type.trim();
        if !declared.is_empty() {
            return declared.parse().ok();
        }
        mime_guess::from_path(&self.file_name).first()
    }
}

/// Adopter-entered report fields exactly as submitted, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FollowUpForm {
    pub health_condition: String,
    pub feeding_status: String,
    pub feeding_notes: String,
    pub behavior_checklist: Vec<String>,
    pub environment_check: String,
    pub notes: Option<String>,
}

/// A weekly report as received from the adopter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpSubmission {
    pub adoption_request_id: AdoptionRequestId,
    pub dog_id: Option<DogId>,
    /// `None` when the week was missing or not a number.
    pub week: Option<u8>,
    pub form: FollowUpForm,
    pub photos: Vec<Attachment>,
    pub vet_report: Option<Attachment>,
}

/// Stored weekly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpReport {
    pub id: FollowUpReportId,
    pub adoption_request_id: AdoptionRequestId,
    pub dog_id: DogId,
    pub week: u8,
    pub health_condition: HealthCondition,
    pub feeding_status: FeedingStatus,
    pub feeding_notes: String,
    pub behavior_checklist: BTreeSet<Behavior>,
    pub environment_check: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vet_report: Option<Attachment>,
    pub submitted_at: DateTime<Utc>,
}
