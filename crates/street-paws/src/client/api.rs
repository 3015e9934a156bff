use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::credentials::CredentialProvider;
use super::error::ClientError;
use crate::config::ClientConfig;
use crate::workflows::adoption::{
    validate_adopter, AdopterForm, AdoptionRequestId, AdoptionRequestView, AdoptionSubmission,
};
use crate::workflows::certificate::Certificate;
use crate::workflows::dogs::DogId;
use crate::workflows::followup::{
    compute_summary, screen_follow_up, Attachment, FollowUpForm, FollowUpReport, FollowUpSummary,
};

/// File picked for upload alongside a weekly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    fn attachment(&self) -> Attachment {
        Attachment {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            size_bytes: self.bytes.len() as u64,
        }
    }

    fn part(&self) -> Result<multipart::Part, ClientError> {
        let part = multipart::Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        if self.content_type.trim().is_empty() {
            return Ok(part);
        }
        part.mime_str(&self.content_type)
            .map_err(|error| ClientError::Configuration(format!("{}: {error}", self.file_name)))
    }
}

/// Everything the adopter fills in for one week.
#[derive(Debug, Clone)]
pub struct FollowUpUpload {
    pub adoption_request_id: AdoptionRequestId,
    pub dog_id: DogId,
    pub week: u8,
    pub form: FollowUpForm,
    pub photos: Vec<UploadFile>,
    pub vet_report: Option<UploadFile>,
}

/// Blocking client for the shelter REST API. One request per call, never retried.
pub struct ShelterApiClient<C> {
    base: Url,
    http: Client,
    credentials: C,
}

impl<C> std::fmt::Debug for ShelterApiClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShelterApiClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl<C> ShelterApiClient<C>
where
    C: CredentialProvider,
{
    pub fn new(config: &ClientConfig, credentials: C) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ClientError::Configuration(error.to_string()))?;

        let mut base = config.api_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            http,
            credentials,
        })
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    /// Validate locally, then create a request for `dog_id`.
    pub fn submit_request(
        &self,
        dog_id: &DogId,
        form: &AdopterForm,
    ) -> Result<AdoptionRequestView, ClientError> {
        ensure_valid_adopter(form)?;
        let body = AdoptionSubmission {
            dog_id: dog_id.clone(),
            adopter: form.clone(),
        };
        let request = self.authorized(self.http.post(self.endpoint("adoption-requests")?))?;
        self.json(request.json(&body))
    }

    pub fn my_requests(&self) -> Result<Vec<AdoptionRequestView>, ClientError> {
        let request = self.authorized(self.http.get(self.endpoint("adoption-requests/mine")?))?;
        self.json(request)
    }

    pub fn edit_adopter_info(
        &self,
        request_id: &AdoptionRequestId,
        form: &AdopterForm,
    ) -> Result<AdoptionRequestView, ClientError> {
        ensure_valid_adopter(form)?;
        let url = self.endpoint(&format!("adoption-requests/{request_id}"))?;
        let request = self.authorized(self.http.put(url))?;
        self.json(request.json(form))
    }

    pub fn withdraw(&self, request_id: &AdoptionRequestId) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("adoption-requests/{request_id}"))?;
        let request = self.authorized(self.http.delete(url))?;
        self.send(request).map(|_| ())
    }

    pub fn follow_up_reports(
        &self,
        request_id: &AdoptionRequestId,
    ) -> Result<Vec<FollowUpReport>, ClientError> {
        let url = self.endpoint(&format!("follow-up-reports/{request_id}"))?;
        self.json(self.authorized(self.http.get(url))?)
    }

    /// Summary recomputed from the report list; disagreement with the server is logged.
    pub fn follow_up_summary(
        &self,
        request_id: &AdoptionRequestId,
    ) -> Result<FollowUpSummary, ClientError> {
        let url = self.endpoint(&format!("follow-up-reports/{request_id}/summary"))?;
        let remote: FollowUpSummary = self.json(self.authorized(self.http.get(url))?)?;
        let local = compute_summary(&self.follow_up_reports(request_id)?);
        if remote != local {
            warn!(
                request_id = %request_id,
                server_completed = remote.completed,
                local_completed = local.completed,
                "server follow-up summary disagrees with submitted reports"
            );
        }
        Ok(local)
    }

    /// Check the fields locally, then the week against known reports, then upload.
    pub fn submit_follow_up(&self, upload: &FollowUpUpload) -> Result<FollowUpReport, ClientError> {
        let photos: Vec<Attachment> = upload.photos.iter().map(UploadFile::attachment).collect();
        let vet_report = upload.vet_report.as_ref().map(UploadFile::attachment);
        screen_follow_up(Some(upload.week), &upload.form, &photos, vet_report.as_ref())
            .map_err(ClientError::Validation)?;

        let summary = compute_summary(&self.follow_up_reports(&upload.adoption_request_id)?);
        if summary.is_complete() {
            return Err(ClientError::AlreadyComplete(format!(
                "all {} follow-up reports are already submitted",
                summary.total_required
            )));
        }
        if summary.has_week(upload.week) {
            return Err(ClientError::DuplicateWeek(format!(
                "week {} already has a report",
                upload.week
            )));
        }

        let form = &upload.form;
        let mut body = multipart::Form::new()
            .text("adoptionRequest", upload.adoption_request_id.0.clone())
            .text("dog", upload.dog_id.0.clone())
            .text("week", upload.week.to_string())
            .text("healthCondition", form.health_condition.clone())
            .text("feedingStatus", form.feeding_status.clone())
            .text("feedingNotes", form.feeding_notes.clone())
            .text("environmentCheck", form.environment_check.clone());
        for behavior in &form.behavior_checklist {
            body = body.text("behaviorChecklist", behavior.clone());
        }
        if let Some(notes) = &form.notes {
            body = body.text("notes", notes.clone());
        }
        for photo in &upload.photos {
            body = body.part("photos[]", photo.part()?);
        }
        if let Some(report) = &upload.vet_report {
            body = body.part("vetReport", report.part()?);
        }

        let request = self.authorized(self.http.post(self.endpoint("follow-up-reports")?))?;
        self.json(request.multipart(body))
    }

    /// Certificate data; fails with `Unauthenticated` before any network call when signed out.
    pub fn certificate(&self, request_id: &AdoptionRequestId) -> Result<Certificate, ClientError> {
        let url = self.endpoint(&format!("adoption-requests/{request_id}/certificate"))?;
        self.json(self.authorized(self.http.get(url))?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|error| ClientError::Configuration(format!("invalid path {path}: {error}")))
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self
            .credentials
            .token()
            .ok_or(ClientError::Unauthenticated)?;
        Ok(request.bearer_auth(token))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send()?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "shelter api response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(ClientError::from_response(status, &body))
    }

    fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(request)?;
        let status = response.status().as_u16();
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|error| ClientError::Server {
            status,
            message: format!("unexpected response body: {error}"),
        })
    }
}

fn ensure_valid_adopter(form: &AdopterForm) -> Result<(), ClientError> {
    validate_adopter(form)
        .into_result(())
        .map_err(ClientError::Validation)
}
