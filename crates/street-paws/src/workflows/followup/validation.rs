use std::collections::BTreeSet;

use super::domain::{
    Attachment, Behavior, FeedingStatus, FollowUpForm, HealthCondition, REQUIRED_WEEKS,
};
use crate::workflows::fields::FieldErrors;

const MIN_NOTE_CHARS: usize = 5;
const MEGABYTE: u64 = 1024 * 1024;
pub const MAX_PHOTO_BYTES: u64 = 5 * MEGABYTE;
pub const MAX_VET_REPORT_BYTES: u64 = 10 * MEGABYTE;

/// Typed report fields once every rule has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenedFollowUp {
    pub week: u8,
    pub health_condition: HealthCondition,
    pub feeding_status: FeedingStatus,
    pub feeding_notes: String,
    pub behavior_checklist: BTreeSet<Behavior>,
    pub environment_check: String,
    pub notes: Option<String>,
}

/// Check the weekly report, collecting one message per offending field.
///
/// `week` is `None` when the adopter sent no week or something that is not a number.
pub fn screen_follow_up(
    week: Option<u8>,
    form: &FollowUpForm,
    photos: &[Attachment],
    vet_report: Option<&Attachment>,
) -> Result<ScreenedFollowUp, FieldErrors> {
    let mut errors = FieldErrors::new();

    let week = week.filter(|week| (1..=REQUIRED_WEEKS).contains(week));
    if week.is_none() {
        errors.add("week", format!("week must be between 1 and {REQUIRED_WEEKS}"));
    }

    let health_condition = HealthCondition::parse(&form.health_condition);
    if health_condition.is_none() {
        errors.add("healthCondition", "select the dog's health condition");
    }

    let feeding_status = FeedingStatus::parse(&form.feeding_status);
    if feeding_status.is_none() {
        errors.add("feedingStatus", "select a feeding status");
    }

    let feeding_notes = form.feeding_notes.trim();
    if feeding_notes.chars().count() < MIN_NOTE_CHARS {
        errors.add(
            "feedingNotes",
            format!("feeding notes must be at least {MIN_NOTE_CHARS} characters"),
        );
    }

    let mut behavior_checklist = BTreeSet::new();
    for raw in &form.behavior_checklist {
        match Behavior::parse(raw) {
            Some(behavior) => {
                behavior_checklist.insert(behavior);
            }
            None => errors.add(
                "behaviorChecklist",
                format!("'{}' is not a recognised behavior", raw.trim()),
            ),
        }
    }
    if form.behavior_checklist.is_empty() {
        errors.add("behaviorChecklist", "tick at least one observed behavior");
    }

    let environment_check = form.environment_check.trim();
    if environment_check.chars().count() < MIN_NOTE_CHARS {
        errors.add(
            "environmentCheck",
            format!("environment check must be at least {MIN_NOTE_CHARS} characters"),
        );
    }

    if let Some(message) = photos.iter().find_map(photo_problem) {
        errors.add("photos", message);
    }

    if let Some(report) = vet_report {
        if report.size_bytes > MAX_VET_REPORT_BYTES {
            errors.add(
                "vetReport",
                format!("vet report {} exceeds 10MB", report.file_name),
            );
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    match (week, health_condition, feeding_status) {
        (Some(week), Some(health_condition), Some(feeding_status)) => Ok(ScreenedFollowUp {
            week,
            health_condition,
            feeding_status,
            feeding_notes: feeding_notes.to_string(),
            behavior_checklist,
            environment_check: environment_check.to_string(),
            notes: form
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|notes| !notes.is_empty())
                .map(str::to_string),
        }),
        _ => Err(errors),
    }
}

fn photo_problem(photo: &Attachment) -> Option<String> {
    let is_image = photo
        .effective_mime()
        .map(|mime| mime.type_() == mime::IMAGE)
        .unwrap_or(false);
    if !is_image {
        return Some(format!("{} is not an image", photo.file_name));
    }
    if photo.size_bytes > MAX_PHOTO_BYTES {
        return Some(format!("photo {} exceeds 5MB", photo.file_name));
    }
    None
}
