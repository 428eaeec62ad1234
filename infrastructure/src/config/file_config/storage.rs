//! Storage configuration from TOML (`[storage]` section)

use crate::storage::FileKeyValueStore;
use chatline_application::DEFAULT_SESSIONS_KEY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding the session record
    pub dir: Option<String>,
    /// Key the session record is stored under
    pub key: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: DEFAULT_SESSIONS_KEY.to_string(),
        }
    }
}

impl FileStorageConfig {
    /// Configured directory, else the platform data directory.
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        match &self.dir {
            Some(dir) => Some(PathBuf::from(dir)),
            None => FileKeyValueStore::default_dir(),
        }
    }
}
