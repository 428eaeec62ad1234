//! Key-value storage port
//!
//! Durable string storage keyed by name. The session store keeps its whole
//! record under a single key.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Backend(String),
}

/// Durable string storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`. `Ok(None)` when nothing was stored yet.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    async fn write(&self, key: &str, value: String) -> Result<(), StorageError>;
}
