//! End-to-end adoption scenarios: the shelter router served over real HTTP and driven by the
//! blocking API client, with staff actions issued as plain authenticated requests.

mod common {
    use std::collections::HashMap;
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;

    use axum::Router;
    use url::Url;

    use street_paws::auth::{AccountId, Role, Session, SessionDirectory};
    use street_paws::client::{ShelterApiClient, StaticCredentials};
    use street_paws::config::ClientConfig;
    use street_paws::workflows::adoption::{
        AdopterForm, AdoptionRecord, AdoptionRepository, AdoptionRequestId,
        AdoptionRequestService, DashboardEvent, DashboardNotifier, NotifyError, RepositoryError,
        ReviewStage,
    };
    use street_paws::workflows::certificate::CertificateService;
    use street_paws::workflows::dogs::{DogDirectory, DogGender, DogId, DogProfile};
    use street_paws::workflows::followup::{
        FollowUpForm, FollowUpReport, FollowUpRepository, FollowUpTracker,
    };
    use street_paws::workflows::{shelter_router, ShelterServices};

    pub(super) const ADOPTER: &str = "token-meera";
    pub(super) const VET: &str = "token-dr-iyer";
    pub(super) const OFFICER: &str = "token-officer-khan";

    #[derive(Default)]
    struct Requests(Mutex<HashMap<AdoptionRequestId, AdoptionRecord>>);

    impl AdoptionRepository for Requests {
        fn insert(&self, record: AdoptionRecord) -> Result<AdoptionRecord, RepositoryError> {
            let mut guard = self.0.lock().expect("requests mutex");
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
            let mut guard = self.0.lock().expect("requests mutex");
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
            let mut guard = self.0.lock().expect("requests mutex");
            match guard.get(id) {
                None => Err(RepositoryError::NotFound),
                Some(stored) if stored.stage() != expected => Err(RepositoryError::Conflict),
                Some(_) => guard.remove(id).ok_or(RepositoryError::NotFound),
            }
        }

        fn fetch(&self, id: &AdoptionRequestId) -> Result<Option<AdoptionRecord>, RepositoryError> {
            Ok(self.0.lock().expect("requests mutex").get(id).cloned())
        }

        fn by_owner(&self, owner: &AccountId) -> Result<Vec<AdoptionRecord>, RepositoryError> {
            Ok(self
                .0
                .lock()
                .expect("requests mutex")
                .values()
                .filter(|record| &record.owner == owner)
                .cloned()
                .collect())
        }

        fn by_dog(&self, dog_id: &DogId) -> Result<Vec<AdoptionRecord>, RepositoryError> {
            Ok(self
                .0
                .lock()
                .expect("requests mutex")
                .values()
                .filter(|record| &record.dog_id == dog_id)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct Reports(Mutex<Vec<FollowUpReport>>);

    impl FollowUpRepository for Reports {
        fn insert(&self, report: FollowUpReport) -> Result<FollowUpReport, RepositoryError> {
            let mut guard = self.0.lock().expect("reports mutex");
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
            Ok(self
                .0
                .lock()
                .expect("reports mutex")
                .iter()
                .filter(|report| &report.adoption_request_id == request_id)
                .cloned()
                .collect())
        }
    }

    struct QuietNotifier;

    impl DashboardNotifier for QuietNotifier {
        fn publish(&self, _event: DashboardEvent) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    struct Dogs;

    impl DogDirectory for Dogs {
        fn find(&self, id: &DogId) -> Option<DogProfile> {
            (id.0 == "dog-bruno").then(|| DogProfile {
                id: id.clone(),
                name: "Bruno".to_string(),
                breed: "Indie".to_string(),
                gender: DogGender::Male,
                age_description: "2 years".to_string(),
                color: "Brown".to_string(),
                vaccinated: true,
            })
        }
    }

    struct Sessions;

    impl SessionDirectory for Sessions {
        fn resolve(&self, token: &str) -> Option<Session> {
            let (account, name, role) = match token {
                ADOPTER => ("user-meera", "Meera Nair", Role::Adopter),
                VET => ("staff-iyer", "Dr. Iyer", Role::Veterinarian),
                OFFICER => ("staff-khan", "Officer Khan", Role::Officer),
                _ => return None,
            };
            Some(Session {
                account: AccountId(account.to_string()),
                display_name: name.to_string(),
                role,
            })
        }
    }

    fn router() -> Router {
        let requests = Arc::new(Requests::default());
        let dogs: Arc<dyn DogDirectory> = Arc::new(Dogs);
        shelter_router(ShelterServices {
            adoptions: Arc::new(AdoptionRequestService::new(
                requests.clone(),
                Arc::new(QuietNotifier),
                dogs.clone(),
            )),
            follow_ups: Arc::new(FollowUpTracker::new(
                requests.clone(),
                Arc::new(Reports::default()),
            )),
            certificates: Arc::new(CertificateService::new(requests, dogs)),
            sessions: Arc::new(Sessions),
        })
    }

    /// Serve a fresh shelter router on an ephemeral port for the rest of the test process.
    pub(super) fn spawn_server() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("local addr");
        let app = router();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("server runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("server stopped");
            });
        });
        Url::parse(&format!("http://{addr}")).expect("server url")
    }

    pub(super) fn client(base: &Url, token: &str) -> ShelterApiClient<StaticCredentials> {
        let mut config = ClientConfig::for_base_url(base.clone());
        config.timeout_secs = 5;
        ShelterApiClient::new(&config, StaticCredentials::new(token)).expect("client")
    }

    /// Staff endpoints have no client wrapper; call them directly.
    pub(super) fn staff_post(base: &Url, token: &str, path: &str, body: serde_json::Value) -> u16 {
        reqwest::blocking::Client::new()
            .post(base.join(path).expect("staff url"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .expect("staff request")
            .status()
            .as_u16()
    }

    pub(super) fn adopter_form() -> AdopterForm {
        AdopterForm {
            full_name: "Meera Nair".to_string(),
            email: "meera.nair@example.org".to_string(),
            phone: "(987) 654-3210".to_string(),
            address: "7 Marine Drive, Kochi".to_string(),
            occupation_status: "self-employed".to_string(),
            home_type: "house".to_string(),
            has_other_pets: true,
            agreed_to_care: true,
        }
    }

    pub(super) fn weekly_form() -> FollowUpForm {
        FollowUpForm {
            health_condition: "healthy".to_string(),
            feeding_status: "regular".to_string(),
            feeding_notes: "Eats twice daily without fuss".to_string(),
            behavior_checklist: vec!["playful".to_string()],
            environment_check: "Garden fenced, kennel indoors at night".to_string(),
            notes: Some("Gets along with the cat".to_string()),
        }
    }
}

mod bruno {
    use serde_json::json;

    use street_paws::client::{ClientError, FollowUpUpload, UploadFile};
    use street_paws::workflows::adoption::{RequestStatus, VetReviewStatus};
    use street_paws::workflows::dogs::DogId;

    use super::common::*;

    fn upload(
        request_id: &street_paws::workflows::adoption::AdoptionRequestId,
        week: u8,
    ) -> FollowUpUpload {
        FollowUpUpload {
            adoption_request_id: request_id.clone(),
            dog_id: DogId("dog-bruno".to_string()),
            week,
            form: weekly_form(),
            photos: vec![UploadFile {
                file_name: format!("week-{week}.png"),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50, 0x4E, 0x47],
            }],
            vet_report: None,
        }
    }

    #[test]
    fn request_to_certificate_over_http() {
        let base = spawn_server();
        let adopter = client(&base, ADOPTER);
        let bruno = DogId("dog-bruno".to_string());

        let request = adopter
            .submit_request(&bruno, &adopter_form())
            .expect("request submitted");
        assert_eq!(request.request_status, RequestStatus::Pending);
        assert_eq!(request.vet_review_status, VetReviewStatus::Pending);
        let mine = adopter.my_requests().expect("my requests");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, request.id);

        assert!(matches!(
            adopter.certificate(&request.id),
            Err(ClientError::NotApproved(_))
        ));
        assert!(matches!(
            adopter.submit_follow_up(&upload(&request.id, 1)),
            Err(ClientError::PreconditionFailed(_))
        ));

        let review_path = format!("adoption-requests/{}/vet-review", request.id);
        let decision_path = format!("adoption-requests/{}/decision", request.id);
        assert_eq!(
            staff_post(&base, ADOPTER, &review_path, json!({ "outcome": "cleared" })),
            403
        );
        assert_eq!(
            staff_post(&base, VET, &review_path, json!({ "outcome": "cleared" })),
            200
        );
        assert_eq!(
            staff_post(&base, OFFICER, &decision_path, json!({ "status": "approved" })),
            200
        );

        assert!(matches!(
            adopter.withdraw(&request.id),
            Err(ClientError::InvalidState(_))
        ));

        for week in 1..=4 {
            let report = adopter
                .submit_follow_up(&upload(&request.id, week))
                .expect("weekly report");
            assert_eq!(report.week, week);
        }
        let summary = adopter.follow_up_summary(&request.id).expect("summary");
        assert_eq!(summary.completed, 4);
        assert!(summary.is_complete());
        assert!(matches!(
            adopter.submit_follow_up(&upload(&request.id, 2)),
            Err(ClientError::AlreadyComplete(_))
        ));

        let certificate = adopter.certificate(&request.id).expect("certificate");
        assert_eq!(certificate.dog.name, "Bruno");
        assert_eq!(certificate.adopter.full_name, "Meera Nair");
        assert_eq!(certificate.veterinarian, "Dr. Iyer");
        assert_eq!(certificate.adoption_officer, "Officer Khan");
    }

    #[test]
    fn withdrawn_request_frees_the_dog() {
        let base = spawn_server();
        let adopter = client(&base, ADOPTER);
        let bruno = DogId("dog-bruno".to_string());

        let first = adopter
            .submit_request(&bruno, &adopter_form())
            .expect("first request");
        assert!(matches!(
            adopter.submit_request(&bruno, &adopter_form()),
            Err(ClientError::DogUnavailable(_))
        ));

        let mut edited = adopter_form();
        edited.address = "9 Beach Road, Kochi".to_string();
        let updated = adopter
            .edit_adopter_info(&first.id, &edited)
            .expect("edit while pending");
        assert_eq!(updated.adopter.address, "9 Beach Road, Kochi");

        adopter.withdraw(&first.id).expect("withdrawn");
        assert!(adopter.my_requests().expect("listed").is_empty());
        adopter
            .submit_request(&bruno, &adopter_form())
            .expect("dog available again");
    }

    #[test]
    fn unknown_token_is_unauthenticated() {
        let base = spawn_server();
        assert!(matches!(
            client(&base, "token-nobody").my_requests(),
            Err(ClientError::Unauthenticated)
        ));
    }
}
