pub mod adoption;
pub mod certificate;
pub mod dogs;
pub mod fields;
pub mod followup;
pub mod http;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use axum::Router;

use crate::auth::SessionDirectory;
use adoption::{AdoptionRepository, DashboardNotifier};
use followup::FollowUpRepository;

/// Services backing the shelter HTTP surface.
pub struct ShelterServices<R, N, F> {
    pub adoptions: Arc<adoption::AdoptionRequestService<R, N>>,
    pub follow_ups: Arc<followup::FollowUpTracker<R, F>>,
    pub certificates: Arc<certificate::CertificateService<R>>,
    pub sessions: Arc<dyn SessionDirectory>,
}

/// Merge the adoption, follow-up, and certificate routers into one application router.
pub fn shelter_router<R, N, F>(services: ShelterServices<R, N, F>) -> Router
where
    R: AdoptionRepository + 'static,
    N: DashboardNotifier + 'static,
    F: FollowUpRepository + 'static,
{
    let ShelterServices {
        adoptions,
        follow_ups,
        certificates,
        sessions,
    } = services;

    adoption::adoption_router(adoptions, sessions.clone())
        .merge(followup::follow_up_router(follow_ups, sessions.clone()))
        .merge(certificate::certificate_router(certificates, sessions))
}
