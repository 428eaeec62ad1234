//! Directory-backed key-value store.

use async_trait::async_trait;
use chatline_application::{KeyValueStore, StorageError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem-backed store: one `<key>.json` file per key under a directory.
///
/// The directory is created lazily on first write. Writes go to a temporary
/// file that is then renamed over the target, so a crash mid-write leaves
/// the previous value intact.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location: `<data dir>/chatline`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("chatline"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value of `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key_to_filename(key))
    }
}

/// Encode a key into a safe filename.
fn key_to_filename(key: &str) -> String {
    let mut encoded = String::new();
    for ch in key.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => encoded.push(ch),
            _ => {
                let mut buf = [0u8; 4];
                for byte in ch.encode_utf8(&mut buf).as_bytes() {
                    encoded.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    format!("{encoded}.json")
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", key_to_filename(key)));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert_eq!(store.read("chat_sessions").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("nested").join("state"));

        store.write("chat_sessions", "[]".to_string()).await.unwrap();
        store.write("chat_sessions", "[1]".to_string()).await.unwrap();

        assert_eq!(
            store.read("chat_sessions").await.unwrap().as_deref(),
            Some("[1]")
        );
        let file = store.path_for("chat_sessions");
        assert!(file.ends_with("chat_sessions.json"));
        assert_eq!(std::fs::read_to_string(file).unwrap(), "[1]");
    }

    #[tokio::test]
    async fn no_temporary_file_is_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        store.write("k", "v".to_string()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        assert_eq!(key_to_filename("chat_sessions"), "chat_sessions.json");
        assert_eq!(key_to_filename("../etc/passwd"), "%2E%2E%2Fetc%2Fpasswd.json");
    }

    #[tokio::test]
    async fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        // A directory where the file should be.
        std::fs::create_dir(store.path_for("k")).unwrap();
        assert!(store.read("k").await.is_err());
    }
}
