//! Infrastructure layer for chatline
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod auth;
pub mod config;
pub mod http;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use auth::{AuthProviderChain, EnvTokenProvider, StaticTokenProvider};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAuthConfig, FileBackendConfig, FileChatConfig,
    FileConfig, FileLoggingConfig, FileStorageConfig,
};
pub use http::{HttpChatTransport, HttpTransportConfig};
pub use logging::JsonlConversationLogger;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
