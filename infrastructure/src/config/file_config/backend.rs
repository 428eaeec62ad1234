//! Backend configuration from TOML (`[backend]` section)

use crate::http::HttpTransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw backend configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL of the chat backend
    pub base_url: String,
    /// Streaming endpoint path
    pub chat_path: String,
    /// Buffered endpoint path
    pub sync_path: String,
    /// Response header carrying the thread id
    pub thread_header: String,
    /// Stream replies as they are generated
    pub streaming: bool,
    /// Timeout in seconds for API calls
    pub timeout_seconds: Option<u64>,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        let defaults = HttpTransportConfig::default();
        Self {
            base_url: defaults.base_url,
            chat_path: defaults.chat_path,
            sync_path: defaults.sync_path,
            thread_header: defaults.thread_header,
            streaming: defaults.streaming,
            timeout_seconds: None,
        }
    }
}

impl FileBackendConfig {
    pub fn to_transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            base_url: self.base_url.clone(),
            chat_path: self.chat_path.clone(),
            sync_path: self.sync_path.clone(),
            thread_header: self.thread_header.clone(),
            streaming: self.streaming,
            timeout: self.timeout_seconds.map(Duration::from_secs),
        }
    }
}
