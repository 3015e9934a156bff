//! Blocking HTTP client for the shelter API plus the small amount of state kept locally.

pub mod api;
pub mod collections;
pub mod credentials;
pub mod error;
pub mod session;


pub use api::{FollowUpUpload, ShelterApiClient, UploadFile};
pub use collections::{Collections, CollectionsError, LocalCollections};
pub use credentials::{CredentialProvider, StaticCredentials, TokenFileCredentials};
pub use error::ClientError;
pub use session::{AuthSession, AuthState};
