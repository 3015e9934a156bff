//! In-memory adapters and fixtures shared by the workflow unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::auth::{AccountId, Role, Session, SessionDirectory};
use crate::clock::Clock;
use crate::workflows::adoption::{
    AdopterForm, AdoptionRecord, AdoptionRepository, AdoptionRequestId, AdoptionRequestService,
    AdoptionSubmission, DashboardEvent, DashboardNotifier, NotifyError, RepositoryError,
    RequestStatus, ReviewStage, VetReviewStatus,
};
use crate::workflows::dogs::{DogDirectory, DogGender, DogId, DogProfile};
use crate::workflows::followup::{
    Attachment, FollowUpForm, FollowUpReport, FollowUpRepository, FollowUpSubmission,
    FollowUpTracker,
};

pub(crate) const ADOPTER_TOKEN: &str = "token-asha";
pub(crate) const OTHER_ADOPTER_TOKEN: &str = "token-ravi";
pub(crate) const VET_TOKEN: &str = "token-dr-mehta";
pub(crate) const OFFICER_TOKEN: &str = "token-officer-singh";

pub(crate) fn adopter() -> AccountId {
    AccountId("user-asha".to_string())
}

pub(crate) fn other_adopter() -> AccountId {
    AccountId("user-ravi".to_string())
}

pub(crate) fn bruno() -> DogId {
    DogId("dog-bruno".to_string())
}

pub(crate) fn laddoo() -> DogId {
    DogId("dog-laddoo".to_string())
}

pub(crate) fn valid_form() -> AdopterForm {
    AdopterForm {
        full_name: "Asha Verma".to_string(),
        email: "asha.verma@example.org".to_string(),
        phone: "123-456-7890".to_string(),
        address: "14 Lake View Road, Pune".to_string(),
        occupation_status: "employed".to_string(),
        home_type: "house".to_string(),
        has_other_pets: false,
        agreed_to_care: true,
    }
}

pub(crate) fn submission(dog_id: DogId) -> AdoptionSubmission {
    AdoptionSubmission {
        dog_id,
        adopter: valid_form(),
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryRepository {
    pub(crate) records: Arc<Mutex<HashMap<AdoptionRequestId, AdoptionRecord>>>,
}

impl AdoptionRepository for MemoryRepository {
    fn insert(&self, record: AdoptionRecord) -> Result<AdoptionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let dog_held = guard
            .values()
            .any(|existing| existing.dog_id == record.dog_id && existing.holds_dog());
        if dog_held || guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update_if(
        &self,
        record: AdoptionRecord,
        expected: ReviewStage,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get(&record.id) {
            None => Err(RepositoryError::NotFound),
            Some(stored) if stored.stage() != expected => Err(RepositoryError::Conflict),
            Some(_) => {
                guard.insert(record.id.clone(), record);
                Ok(())
            }
        }
    }

    fn remove_if(
        &self,
        id: &AdoptionRequestId,
        expected: ReviewStage,
    ) -> Result<AdoptionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get(id) {
            None => Err(RepositoryError::NotFound),
            Some(stored) if stored.stage() != expected => Err(RepositoryError::Conflict),
            Some(_) => guard.remove(id).ok_or(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &AdoptionRequestId) -> Result<Option<AdoptionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_owner(&self, owner: &AccountId) -> Result<Vec<AdoptionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.owner == owner)
            .cloned()
            .collect())
    }

    fn by_dog(&self, dog_id: &DogId) -> Result<Vec<AdoptionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.dog_id == dog_id)
            .cloned()
            .collect())
    }
}

pub(crate) struct UnavailableRepository;

impl AdoptionRepository for UnavailableRepository {
    fn insert(&self, _record: AdoptionRecord) -> Result<AdoptionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_if(
        &self,
        _record: AdoptionRecord,
        _expected: ReviewStage,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove_if(
        &self,
        _id: &AdoptionRequestId,
        _expected: ReviewStage,
    ) -> Result<AdoptionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AdoptionRequestId) -> Result<Option<AdoptionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_owner(&self, _owner: &AccountId) -> Result<Vec<AdoptionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_dog(&self, _dog_id: &DogId) -> Result<Vec<AdoptionRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryNotifier {
    events: Arc<Mutex<Vec<DashboardEvent>>>,
}

impl MemoryNotifier {
    pub(crate) fn events(&self) -> Vec<DashboardEvent> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl DashboardNotifier for MemoryNotifier {
    fn publish(&self, event: DashboardEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(crate) struct FailingNotifier;

impl DashboardNotifier for FailingNotifier {
    fn publish(&self, _event: DashboardEvent) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("socket closed".to_string()))
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryFollowUps {
    pub(crate) reports: Arc<Mutex<Vec<FollowUpReport>>>,
}

impl FollowUpRepository for MemoryFollowUps {
    fn insert(&self, report: FollowUpReport) -> Result<FollowUpReport, RepositoryError> {
        let mut guard = self.reports.lock().expect("follow-up mutex poisoned");
        if guard.iter().any(|existing| {
            existing.adoption_request_id == report.adoption_request_id
                && existing.week == report.week
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(report.clone());
        Ok(report)
    }

    fn for_request(
        &self,
        request_id: &AdoptionRequestId,
    ) -> Result<Vec<FollowUpReport>, RepositoryError> {
        let guard = self.reports.lock().expect("follow-up mutex poisoned");
        Ok(guard
            .iter()
            .filter(|report| &report.adoption_request_id == request_id)
            .cloned()
            .collect())
    }
}

pub(crate) struct MemoryDogs {
    dogs: BTreeMap<DogId, DogProfile>,
}

impl Default for MemoryDogs {
    fn default() -> Self {
        let dogs = [
            DogProfile {
                id: bruno(),
                name: "Bruno".to_string(),
                breed: "Indie".to_string(),
                gender: DogGender::Male,
                age_description: "2 years".to_string(),
                color: "Brown".to_string(),
                vaccinated: true,
            },
            DogProfile {
                id: laddoo(),
                name: "Laddoo".to_string(),
                breed: "Indie mix".to_string(),
                gender: DogGender::Female,
                age_description: "8 months".to_string(),
                color: "Fawn".to_string(),
                vaccinated: false,
            },
        ];
        Self {
            dogs: dogs.into_iter().map(|dog| (dog.id.clone(), dog)).collect(),
        }
    }
}

impl DogDirectory for MemoryDogs {
    fn find(&self, id: &DogId) -> Option<DogProfile> {
        self.dogs.get(id).cloned()
    }
}

pub(crate) struct MemorySessions {
    sessions: HashMap<String, Session>,
}

impl Default for MemorySessions {
    fn default() -> Self {
        let entries = [
            (ADOPTER_TOKEN, adopter(), "Asha Verma", Role::Adopter),
            (OTHER_ADOPTER_TOKEN, other_adopter(), "Ravi Kumar", Role::Adopter),
            (
                VET_TOKEN,
                AccountId("staff-mehta".to_string()),
                "Dr. Mehta",
                Role::Veterinarian,
            ),
            (
                OFFICER_TOKEN,
                AccountId("staff-singh".to_string()),
                "Officer Singh",
                Role::Officer,
            ),
        ];
        Self {
            sessions: entries
                .into_iter()
                .map(|(token, account, name, role)| {
                    (
                        token.to_string(),
                        Session {
                            account,
                            display_name: name.to_string(),
                            role,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl MemorySessions {
    pub(crate) fn session(&self, token: &str) -> Session {
        self.sessions.get(token).cloned().expect("fixture session")
    }
}

impl SessionDirectory for MemorySessions {
    fn resolve(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).cloned()
    }
}

/// Clock advancing one minute per reading so creation order is observable.
pub(crate) struct StepClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl Default for StepClock {
    fn default() -> Self {
        Self {
            start: Utc
                .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
                .single()
                .expect("valid start"),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        self.start + Duration::minutes(tick)
    }
}

pub(crate) type TestService = AdoptionRequestService<MemoryRepository, MemoryNotifier>;

pub(crate) fn build_service() -> (TestService, Arc<MemoryRepository>, Arc<MemoryNotifier>) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = AdoptionRequestService::new(
        repository.clone(),
        notifier.clone(),
        Arc::new(MemoryDogs::default()),
    )
    .with_clock(Arc::new(StepClock::default()));
    (service, repository, notifier)
}

/// Submit for Bruno, clear the vet review, and approve.
pub(crate) fn approved_request(service: &TestService) -> AdoptionRecord {
    approved_request_for(service, bruno())
}

pub(crate) fn approved_request_for(service: &TestService, dog_id: DogId) -> AdoptionRecord {
    let sessions = MemorySessions::default();
    let record = service
        .submit(&adopter(), submission(dog_id))
        .expect("submission succeeds");
    service
        .record_vet_review(
            &record.id,
            VetReviewStatus::Cleared,
            sessions.session(VET_TOKEN).staff_identity(),
        )
        .expect("vet review recorded");
    let approved = service
        .decide(
            &record.id,
            RequestStatus::Approved,
            sessions.session(OFFICER_TOKEN).staff_identity(),
            None,
        )
        .expect("approval succeeds");
    assert_eq!(approved.status, RequestStatus::Approved);
    approved
}

pub(crate) type TestTracker = FollowUpTracker<MemoryRepository, MemoryFollowUps>;

/// Adoption service plus a tracker reading the same request store.
pub(crate) fn build_tracker() -> (TestService, TestTracker, Arc<MemoryFollowUps>) {
    let (service, repository, _) = build_service();
    let reports = Arc::new(MemoryFollowUps::default());
    let tracker = FollowUpTracker::new(repository, reports.clone())
        .with_clock(Arc::new(StepClock::default()));
    (service, tracker, reports)
}

pub(crate) fn follow_up_form() -> FollowUpForm {
    FollowUpForm {
        health_condition: "healthy".to_string(),
        feeding_status: "regular".to_string(),
        feeding_notes: "Rice and chicken twice a day".to_string(),
        behavior_checklist: vec!["playful".to_string()],
        environment_check: "Fenced yard with shade".to_string(),
        notes: None,
    }
}

pub(crate) fn follow_up(request_id: &AdoptionRequestId, week: u8) -> FollowUpSubmission {
    FollowUpSubmission {
        adoption_request_id: request_id.clone(),
        dog_id: Some(bruno()),
        week: Some(week),
        form: follow_up_form(),
        photos: vec![Attachment {
            file_name: format!("bruno-week-{week}.jpg"),
            content_type: "image/jpeg".to_string(),
            size_bytes: 420_000,
        }],
        vet_report: None,
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
