//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section converts into the settings type of the component it
//! configures.

mod auth;
mod backend;
mod chat;
mod logging;
mod storage;

pub use auth::{DEFAULT_TOKEN_ENV, FileAuthConfig};
pub use backend::FileBackendConfig;
pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use storage::FileStorageConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("backend.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("backend.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("chat.flush_every cannot be 0")]
    InvalidFlushInterval,

    #[error("storage.key cannot be empty")]
    EmptyStorageKey,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat backend endpoints
    pub backend: FileBackendConfig,
    /// Credential sources
    pub auth: FileAuthConfig,
    /// Session persistence
    pub storage: FileStorageConfig,
    /// Send behavior
    pub chat: FileChatConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.backend.base_url.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyBaseUrl);
        }
        if self.backend.timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if self.chat.flush_every == 0 {
            issues.push(ConfigValidationError::InvalidFlushInterval);
        }
        if self.storage.key.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyStorageKey);
        }

        issues
    }
}
