use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a dog listed for adoption.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DogId(pub String);

impl fmt::Display for DogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DogGender {
    Male,
    Female,
}

/// Shelter-side description of a dog as shown on listings and certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogProfile {
    pub id: DogId,
    pub name: String,
    pub breed: String,
    pub gender: DogGender,
    pub age_description: String,
    pub color: String,
    pub vaccinated: bool,
}

/// Read access to the shelter's dog listings; intake and editing live elsewhere.
pub trait DogDirectory: Send + Sync {
    fn find(&self, id: &DogId) -> Option<DogProfile>;
}
