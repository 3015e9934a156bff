//! Bearer-token sessions shared by every router.

use std::fmt;

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

/// Stable account identifier of a platform user (adopter or staff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display identity of a staff member recorded on reviews and certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffIdentity {
    pub account: AccountId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Adopter,
    Veterinarian,
    Officer,
}

impl Role {
    pub const fn is_staff(self) -> bool {
        matches!(self, Role::Veterinarian | Role::Officer)
    }
}

/// Resolved caller of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub account: AccountId,
    pub display_name: String,
    pub role: Role,
}

impl Session {
    pub fn staff_identity(&self) -> StaffIdentity {
        StaffIdentity {
            account: self.account.clone(),
            name: self.display_name.clone(),
        }
    }
}

/// Token to session lookup; issuing tokens belongs to the login service.
pub trait SessionDirectory: Send + Sync {
    fn resolve(&self, token: &str) -> Option<Session>;
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
