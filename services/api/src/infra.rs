use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use street_paws::auth::{AccountId, Role, Session, SessionDirectory};
use street_paws::workflows::adoption::{
    AdoptionRecord, AdoptionRepository, AdoptionRequestId, AdoptionRequestService,
    DashboardEvent, DashboardNotifier, NotifyError, RepositoryError, ReviewStage,
};
use street_paws::workflows::certificate::CertificateService;
use street_paws::workflows::dogs::{DogDirectory, DogGender, DogId, DogProfile};
use street_paws::workflows::followup::{FollowUpReport, FollowUpRepository, FollowUpTracker};
use street_paws::workflows::ShelterServices;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn locked<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAdoptionRepository {
    records: Arc<Mutex<HashMap<AdoptionRequestId, AdoptionRecord>>>,
}

impl AdoptionRepository for InMemoryAdoptionRepository {
    fn insert(&self, record: AdoptionRecord) -> Result<AdoptionRecord, RepositoryError> {
        let mut guard = locked(&self.records)?;
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
        let mut guard = locked(&self.records)?;
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
        let mut guard = locked(&self.records)?;
        match guard.get(id) {
            None => Err(RepositoryError::NotFound),
            Some(stored) if stored.stage() != expected => Err(RepositoryError::Conflict),
            Some(_) => guard.remove(id).ok_or(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &AdoptionRequestId) -> Result<Option<AdoptionRecord>, RepositoryError> {
        Ok(locked(&self.records)?.get(id).cloned())
    }

    fn by_owner(&self, owner: &AccountId) -> Result<Vec<AdoptionRecord>, RepositoryError> {
        Ok(locked(&self.records)?
            .values()
            .filter(|record| &record.owner == owner)
            .cloned()
            .collect())
    }

    fn by_dog(&self, dog_id: &DogId) -> Result<Vec<AdoptionRecord>, RepositoryError> {
        Ok(locked(&self.records)?
            .values()
            .filter(|record| &record.dog_id == dog_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFollowUpRepository {
    reports: Arc<Mutex<Vec<FollowUpReport>>>,
}

impl FollowUpRepository for InMemoryFollowUpRepository {
    fn insert(&self, report: FollowUpReport) -> Result<FollowUpReport, RepositoryError> {
        let mut guard = locked(&self.reports)?;
        let taken = guard.iter().any(|existing| {
            existing.adoption_request_id == report.adoption_request_id
                && existing.week == report.week
        });
        if taken {
            return Err(RepositoryError::Conflict);
        }
        guard.push(report.clone());
        Ok(report)
    }

    fn for_request(
        &self,
        request_id: &AdoptionRequestId,
    ) -> Result<Vec<FollowUpReport>, RepositoryError> {
        Ok(locked(&self.reports)?
            .iter()
            .filter(|report| &report.adoption_request_id == request_id)
            .cloned()
            .collect())
    }
}

/// Stand-in for the dashboard push channel: logs each event and keeps it for inspection.
#[derive(Default, Clone)]
pub(crate) struct LoggingDashboardNotifier {
    events: Arc<Mutex<Vec<DashboardEvent>>>,
}

impl DashboardNotifier for LoggingDashboardNotifier {
    fn publish(&self, event: DashboardEvent) -> Result<(), NotifyError> {
        info!(kind = ?event.kind, request_id = %event.request_id, "dashboard event");
        self.events
            .lock()
            .map_err(|_| NotifyError::Transport("event log poisoned".to_string()))?
            .push(event);
        Ok(())
    }
}

impl LoggingDashboardNotifier {
    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<DashboardEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

pub(crate) struct SeededDogs {
    dogs: HashMap<DogId, DogProfile>,
}

impl Default for SeededDogs {
    fn default() -> Self {
        let dogs = [
            ("dog-bruno", "Bruno", "Indie", DogGender::Male, "2 years", "Brown", true),
            ("dog-laddoo", "Laddoo", "Indie mix", DogGender::Female, "8 months", "Fawn", false),
            ("dog-moti", "Moti", "Indie", DogGender::Male, "5 years", "Black and white", true),
        ];
        Self {
            dogs: dogs
                .into_iter()
                .map(|(id, name, breed, gender, age, color, vaccinated)| {
                    let profile = DogProfile {
                        id: DogId(id.to_string()),
                        name: name.to_string(),
                        breed: breed.to_string(),
                        gender,
                        age_description: age.to_string(),
                        color: color.to_string(),
                        vaccinated,
                    };
                    (profile.id.clone(), profile)
                })
                .collect(),
        }
    }
}

impl DogDirectory for SeededDogs {
    fn find(&self, id: &DogId) -> Option<DogProfile> {
        self.dogs.get(id).cloned()
    }
}

pub(crate) const DEMO_ADOPTER_TOKEN: &str = "demo-adopter";
pub(crate) const DEMO_VET_TOKEN: &str = "demo-vet";
pub(crate) const DEMO_OFFICER_TOKEN: &str = "demo-officer";

/// Fixed demo accounts; real deployments resolve tokens against the login service.
pub(crate) struct SeededSessions {
    sessions: HashMap<String, Session>,
}

impl Default for SeededSessions {
    fn default() -> Self {
        let accounts = [
            (DEMO_ADOPTER_TOKEN, "user-priya", "Priya Sharma", Role::Adopter),
            (DEMO_VET_TOKEN, "staff-vet-rao", "Dr. Kavya Rao", Role::Veterinarian),
            (DEMO_OFFICER_TOKEN, "staff-officer-das", "Arjun Das", Role::Officer),
        ];
        Self {
            sessions: accounts
                .into_iter()
                .map(|(token, account, name, role)| {
                    let session = Session {
                        account: AccountId(account.to_string()),
                        display_name: name.to_string(),
                        role,
                    };
                    (token.to_string(), session)
                })
                .collect(),
        }
    }
}

impl SessionDirectory for SeededSessions {
    fn resolve(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).cloned()
    }
}

pub(crate) type ShelterStack =
    ShelterServices<InMemoryAdoptionRepository, LoggingDashboardNotifier, InMemoryFollowUpRepository>;

/// Wire the workflow services over shared in-memory stores.
pub(crate) fn in_memory_services() -> (ShelterStack, Arc<LoggingDashboardNotifier>) {
    let requests = Arc::new(InMemoryAdoptionRepository::default());
    let reports = Arc::new(InMemoryFollowUpRepository::default());
    let notifier = Arc::new(LoggingDashboardNotifier::default());
    let dogs: Arc<dyn DogDirectory> = Arc::new(SeededDogs::default());

    let services = ShelterServices {
        adoptions: Arc::new(AdoptionRequestService::new(
            requests.clone(),
            notifier.clone(),
            dogs.clone(),
        )),
        follow_ups: Arc::new(FollowUpTracker::new(requests.clone(), reports)),
        certificates: Arc::new(CertificateService::new(requests, dogs)),
        sessions: Arc::new(SeededSessions::default()),
    };
    (services, notifier)
}
