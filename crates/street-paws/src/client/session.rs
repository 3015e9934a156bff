use std::io;

use tokio::sync::watch;
use tracing::info;

use super::credentials::{CredentialProvider, TokenFileCredentials};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    SignedOut,
    SignedIn,
}

/// Login state backed by the token file; every change is published to subscribers.
pub struct AuthSession {
    store: TokenFileCredentials,
    state: watch::Sender<AuthState>,
}

impl AuthSession {
    pub fn new(store: TokenFileCredentials) -> Self {
        let initial = if store.token().is_some() {
            AuthState::SignedIn
        } else {
            AuthState::SignedOut
        };
        let (state, _) = watch::channel(initial);
        Self { store, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> AuthState {
        *self.state.borrow()
    }

    pub fn login(&self, token: &str) -> io::Result<()> {
        if token.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "token must not be empty",
            ));
        }
        self.store.store(token)?;
        self.state.send_replace(AuthState::SignedIn);
        info!(path = %self.store.path().display(), "signed in");
        Ok(())
    }

    pub fn logout(&self) -> io::Result<()> {
        self.store.clear()?;
        self.state.send_replace(AuthState::SignedOut);
        info!("signed out");
        Ok(())
    }
}

impl CredentialProvider for AuthSession {
    fn token(&self) -> Option<String> {
        self.store.token()
    }
}
