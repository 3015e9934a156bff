//! Client-side subcommands. Each runs on the blocking pool because the HTTP client is blocking.

use std::io;

use street_paws::client::{
    AuthSession, LocalCollections, ShelterApiClient, TokenFileCredentials,
};
use street_paws::config::AppConfig;
use street_paws::error::AppError;
use street_paws::telemetry;
use street_paws::workflows::adoption::AdoptionRequestId;

/// Load configuration and logging, then run `command` off the async runtime.
pub(crate) async fn blocking<F>(command: F) -> Result<(), AppError>
where
    F: FnOnce(&AppConfig) -> Result<(), AppError> + Send + 'static,
{
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    tokio::task::spawn_blocking(move || command(&config))
        .await
        .map_err(|error| AppError::Io(io::Error::other(error)))?
}

fn session(config: &AppConfig) -> AuthSession {
    AuthSession::new(TokenFileCredentials::new(&config.client.token_path))
}

fn api(config: &AppConfig) -> Result<ShelterApiClient<AuthSession>, AppError> {
    Ok(ShelterApiClient::new(&config.client, session(config))?)
}

pub(crate) fn login(config: &AppConfig, token: &str) -> Result<(), AppError> {
    session(config).login(token)?;
    println!("Signed in.");
    Ok(())
}

pub(crate) fn logout(config: &AppConfig) -> Result<(), AppError> {
    session(config).logout()?;
    println!("Signed out.");
    Ok(())
}

pub(crate) fn my_requests(config: &AppConfig) -> Result<(), AppError> {
    let requests = api(config)?.my_requests()?;
    if requests.is_empty() {
        println!("No adoption requests yet.");
    }
    for request in requests {
        println!(
            "{}  dog={}  request={}  vet={}  created={}",
            request.id,
            request.dog_id,
            request.request_status,
            request.vet_review_status,
            request.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub(crate) fn follow_up_summary(config: &AppConfig, request_id: &str) -> Result<(), AppError> {
    let summary = api(config)?.follow_up_summary(&AdoptionRequestId(request_id.to_string()))?;
    let weeks: Vec<String> = summary
        .submitted_weeks
        .iter()
        .map(|week| week.to_string())
        .collect();
    println!(
        "Follow-ups {}/{} (weeks submitted: {})",
        summary.completed,
        summary.total_required,
        if weeks.is_empty() {
            "none".to_string()
        } else {
            weeks.join(", ")
        }
    );
    if summary.is_complete() {
        println!("All follow-ups submitted.");
    } else {
        println!("Next due: week {}", summary.next_due_week);
    }
    Ok(())
}

pub(crate) fn certificate(config: &AppConfig, request_id: &str) -> Result<(), AppError> {
    let certificate = api(config)?.certificate(&AdoptionRequestId(request_id.to_string()))?;
    let rendered = serde_json::to_string_pretty(&certificate)
        .map_err(|error| AppError::Io(io::Error::other(error)))?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn favorite(config: &AppConfig, dog_id: &str) -> Result<(), AppError> {
    let added = LocalCollections::new(&config.client.collections_path).toggle_favorite(dog_id)?;
    println!(
        "{dog_id} {} favorites",
        if added { "added to" } else { "removed from" }
    );
    Ok(())
}

pub(crate) fn bookmark(config: &AppConfig, event_id: &str) -> Result<(), AppError> {
    let added = LocalCollections::new(&config.client.collections_path).toggle_bookmark(event_id)?;
    println!(
        "{event_id} {}",
        if added { "bookmarked" } else { "bookmark removed" }
    );
    Ok(())
}
