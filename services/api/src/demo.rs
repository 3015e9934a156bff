use crate::infra::{in_memory_services, DEMO_ADOPTER_TOKEN, DEMO_OFFICER_TOKEN, DEMO_VET_TOKEN};
use std::io;
use street_paws::auth::Session;
use street_paws::error::AppError;
use street_paws::workflows::adoption::{
    AdopterForm, AdoptionSubmission, RequestStatus, VetReviewStatus,
};
use street_paws::workflows::dogs::DogId;
use street_paws::workflows::followup::{
    Attachment, FollowUpError, FollowUpForm, FollowUpSubmission, REQUIRED_WEEKS,
};
use street_paws::workflows::ShelterServices;

pub(crate) fn run_demo() -> Result<(), AppError> {
    println!("Street Paws adoption demo");
    for line in bruno_scenario()? {
        println!("{line}");
    }
    Ok(())
}

fn session<R, N, F>(services: &ShelterServices<R, N, F>, token: &str) -> Result<Session, AppError> {
    services.sessions.resolve(token).ok_or_else(|| {
        AppError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("demo token {token} is not seeded"),
        ))
    })
}

fn adopter_form() -> AdopterForm {
    AdopterForm {
        full_name: "Priya Sharma".to_string(),
        email: "priya.sharma@example.org".to_string(),
        phone: "98765-43210".to_string(),
        address: "22 Gandhi Nagar, Bengaluru".to_string(),
        occupation_status: "employed".to_string(),
        home_type: "apartment".to_string(),
        has_other_pets: false,
        agreed_to_care: true,
    }
}

fn weekly_form(week: u8) -> FollowUpForm {
    FollowUpForm {
        health_condition: "healthy".to_string(),
        feeding_status: "regular".to_string(),
        feeding_notes: format!("Week {week}: two meals a day, eating well"),
        behavior_checklist: vec!["playful".to_string(), "calm".to_string()],
        environment_check: "Balcony is netted and shaded".to_string(),
        notes: None,
    }
}

/// Request, review, approval, four weekly reports, and the certificate for Bruno.
pub(crate) fn bruno_scenario() -> Result<Vec<String>, AppError> {
    let (services, _notifier) = in_memory_services();
    let adopter = session(&services, DEMO_ADOPTER_TOKEN)?;
    let vet = session(&services, DEMO_VET_TOKEN)?;
    let officer = session(&services, DEMO_OFFICER_TOKEN)?;
    let bruno = DogId("dog-bruno".to_string());
    let mut transcript = Vec::new();

    let request = services.adoptions.submit(
        &adopter.account,
        AdoptionSubmission {
            dog_id: bruno.clone(),
            adopter: adopter_form(),
        },
    )?;
    transcript.push(format!(
        "1. {} requested {} as {} (request {}/vet {})",
        adopter.display_name, bruno, request.id, request.status, request.vet_review.status
    ));

    let mine = services.adoptions.get_mine(&adopter.account)?;
    transcript.push(format!("2. My requests: {}", mine.len()));

    services
        .adoptions
        .record_vet_review(&request.id, VetReviewStatus::Cleared, vet.staff_identity())?;
    transcript.push(format!("3. {} cleared the vet review", vet.display_name));

    let approved = services.adoptions.decide(
        &request.id,
        RequestStatus::Approved,
        officer.staff_identity(),
        Some("Home visit done".to_string()),
    )?;
    transcript.push(format!(
        "4. {} set the request to {}",
        officer.display_name, approved.status
    ));

    for week in 1..=REQUIRED_WEEKS {
        services.follow_ups.submit(
            &adopter.account,
            FollowUpSubmission {
                adoption_request_id: request.id.clone(),
                dog_id: Some(bruno.clone()),
                week: Some(week),
                form: weekly_form(week),
                photos: vec![Attachment {
                    file_name: format!("bruno-week-{week}.jpg"),
                    content_type: "image/jpeg".to_string(),
                    size_bytes: 350_000,
                }],
                vet_report: None,
            },
        )?;
        let summary = services.follow_ups.summary(&adopter, &request.id)?;
        transcript.push(format!(
            "5.{week} Week {week} submitted: {}/{} complete, next due week {}",
            summary.completed, summary.total_required, summary.next_due_week
        ));
    }

    let extra = FollowUpSubmission {
        adoption_request_id: request.id.clone(),
        dog_id: Some(bruno.clone()),
        week: Some(2),
        form: weekly_form(2),
        photos: Vec::new(),
        vet_report: None,
    };
    match services.follow_ups.submit(&adopter.account, extra) {
        Err(FollowUpError::AlreadyComplete(_)) => {
            transcript.push("6. A fifth report is refused: follow-ups already complete".to_string())
        }
        Ok(report) => {
            return Err(AppError::Io(io::Error::other(format!(
                "fifth follow-up {} was unexpectedly accepted",
                report.id
            ))))
        }
        Err(other) => return Err(other.into()),
    }

    let certificate = services.certificates.issue(&adopter, &request.id)?;
    transcript.push(format!(
        "7. Certificate {}: {} adopted {} ({}, {}) on {}; vet {}, officer {}",
        certificate.certificate_number,
        certificate.adopter.full_name,
        certificate.dog.name,
        certificate.dog.breed,
        certificate.dog.age_description,
        certificate.approved_on.format("%Y-%m-%d"),
        certificate.veterinarian,
        certificate.adoption_officer
    ));

    Ok(transcript)
}
