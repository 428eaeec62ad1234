//! In-memory key-value store.

use async_trait::async_trait;
use chatline_application::{KeyValueStore, StorageError};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory store backed by a `HashMap` behind a `RwLock`.
///
/// Nothing survives the process.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.read("k").await.unwrap(), None);

        store.write("k", "one".to_string()).await.unwrap();
        store.write("k", "two".to_string()).await.unwrap();

        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.read("other").await.unwrap(), None);
    }
}
