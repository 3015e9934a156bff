use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Favorite dogs and bookmarked events kept on this machine only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collections {
    pub favorites: BTreeSet<String>,
    pub bookmarks: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct LocalCollections {
    path: PathBuf,
}

impl LocalCollections {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Collections, CollectionsError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Collections::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Collections::default()),
            Err(error) => Err(error.into()),
        }
    }

    /// Flip a dog's favorite flag; returns whether it is now a favorite.
    pub fn toggle_favorite(&self, dog_id: &str) -> Result<bool, CollectionsError> {
        self.toggle(dog_id, |collections| &mut collections.favorites)
    }

    /// Flip an event bookmark; returns whether it is now bookmarked.
    pub fn toggle_bookmark(&self, event_id: &str) -> Result<bool, CollectionsError> {
        self.toggle(event_id, |collections| &mut collections.bookmarks)
    }

    fn toggle(
        &self,
        id: &str,
        set: impl FnOnce(&mut Collections) -> &mut BTreeSet<String>,
    ) -> Result<bool, CollectionsError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CollectionsError::EmptyId);
        }
        let mut collections = self.load()?;
        let members = set(&mut collections);
        let now_member = if members.remove(id) {
            false
        } else {
            members.insert(id.to_string());
            true
        };
        self.save(&collections)?;
        Ok(now_member)
    }

    fn save(&self, collections: &Collections) -> Result<(), CollectionsError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(collections)?)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollectionsError {
    #[error("collections file unreadable: {0}")]
    Io(#[from] io::Error),
    #[error("collections file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("identifier must not be empty")]
    EmptyId,
}
