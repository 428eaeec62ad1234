//! Session store use case
//!
//! Owns the bounded session collection, tracks the active session, and
//! persists the whole collection under one key after every mutation.
//!
//! Reads are synchronous snapshots. Mutations apply in memory first, then
//! write through the [`KeyValueStore`]. Persistence failures are logged and
//! swallowed: the in-memory state stays authoritative for the process.
//!
//! Each mutation is stamped with a generation number taken under the state
//! lock. Writes go through a gate that skips any snapshot older than the
//! last one written, so a slow write can never overwrite a newer record.

use crate::ports::key_value_store::KeyValueStore;
use chatline_domain::{DomainError, Message, Session, SessionCollection};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Storage key used when none is configured.
pub const DEFAULT_SESSIONS_KEY: &str = "chat_sessions";

struct State {
    collection: SessionCollection,
    generation: u64,
}

/// Serialized collection tagged with the mutation that produced it.
struct Snapshot {
    generation: u64,
    record: String,
}

/// Bounded, persisted list of chat sessions with an active pointer.
pub struct SessionStore {
    state: Mutex<State>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
    /// Generation of the last snapshot handed to storage.
    written: tokio::sync::Mutex<u64>,
}

impl SessionStore {
    /// Restore sessions from storage.
    ///
    /// An absent or corrupt record is logged and treated as empty, and the
    /// fresh session that replaces it is persisted. When the read itself
    /// fails the fresh session stays in memory only: the record may still be
    /// intact and is left alone until the first real mutation.
    pub async fn load(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let (restored, readable) = match storage.read(&key).await {
            Ok(Some(record)) => match SessionCollection::parse_record(&record) {
                Ok(sessions) => (sessions, true),
                Err(e) => {
                    warn!("Discarding unreadable session record '{}': {}", key, e);
                    (Vec::new(), true)
                }
            },
            Ok(None) => (Vec::new(), true),
            Err(e) => {
                warn!("Failed to read session record '{}': {}", key, e);
                (Vec::new(), false)
            }
        };

        let needs_initial = restored.is_empty() && readable;
        info!("Restored {} session(s) from '{}'", restored.len(), key);

        let store = Self {
            state: Mutex::new(State {
                collection: SessionCollection::from_sessions(restored),
                generation: 0,
            }),
            storage,
            key,
            written: tokio::sync::Mutex::new(0),
        };

        if needs_initial {
            let snapshot = store.mutate(|_| ()).1;
            store.persist(snapshot).await;
        }

        store
    }

    /// All sessions, newest first.
    pub fn sessions(&self) -> Vec<Session> {
        self.lock().collection.sessions().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().collection.len()
    }

    /// Always false: at least one session exists.
    pub fn is_empty(&self) -> bool {
        self.lock().collection.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        self.lock().collection.get(id).cloned()
    }

    pub fn active_id(&self) -> String {
        self.lock().collection.active_id().to_string()
    }

    pub fn active_session(&self) -> Session {
        self.lock().collection.active().clone()
    }

    /// Create a fresh session at the front and make it active.
    ///
    /// Evicts the oldest session when the bound is exceeded.
    pub async fn create(&self) -> String {
        let (id, snapshot) = self.mutate(|collection| collection.create());
        debug!("Created session {}", id);
        self.persist(snapshot).await;
        id
    }

    /// Make `id` the active session, falling back to the newest one when
    /// `id` is unknown. Returns the id that is active afterwards.
    ///
    /// The active pointer is not persisted.
    pub fn switch_active(&self, id: &str) -> String {
        let mut state = self.lock();
        let active = state.collection.switch_active(id).to_string();
        if active != id {
            debug!("Unknown session {}, switched to {}", id, active);
        }
        active
    }

    /// Remove a session. Returns false (and changes nothing) when `id` is
    /// unknown.
    pub async fn close(&self, id: &str) -> bool {
        let (removed, snapshot) = self.mutate(|collection| collection.close(id));
        if !removed {
            debug!("Ignoring close of unknown session {}", id);
            return false;
        }
        debug!("Closed session {}", id);
        self.persist(snapshot).await;
        true
    }

    /// Replace a session's messages and thread id, deriving its title from
    /// the first user message while the title is still the default.
    pub async fn update_messages(
        &self,
        id: &str,
        messages: Vec<Message>,
        thread_id: Option<String>,
    ) -> Result<(), DomainError> {
        let (result, snapshot) =
            self.mutate(|collection| collection.update_messages(id, messages, thread_id));
        result?;
        self.persist(snapshot).await;
        Ok(())
    }

    /// Like [`update_messages`](Self::update_messages), for callers that
    /// cannot await (such as `Drop`). The in-memory change is immediate; the
    /// write is spawned on the current runtime, and skipped when there is
    /// none.
    pub fn update_messages_detached(
        self: &Arc<Self>,
        id: &str,
        messages: Vec<Message>,
        thread_id: Option<String>,
    ) -> Result<(), DomainError> {
        let (result, snapshot) =
            self.mutate(|collection| collection.update_messages(id, messages, thread_id));
        result?;
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let store = Arc::clone(self);
                runtime.spawn(async move { store.persist(snapshot).await });
            }
            Err(_) => warn!("No runtime to persist sessions to '{}'", self.key),
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` and capture the resulting snapshot under the same lock.
    fn mutate<R>(&self, f: impl FnOnce(&mut SessionCollection) -> R) -> (R, Option<Snapshot>) {
        let mut state = self.lock();
        let result = f(&mut state.collection);
        state.generation += 1;
        let snapshot = match state.collection.to_record() {
            Ok(record) => Some(Snapshot {
                generation: state.generation,
                record,
            }),
            Err(e) => {
                warn!("Failed to serialize sessions: {}", e);
                None
            }
        };
        (result, snapshot)
    }

    async fn persist(&self, snapshot: Option<Snapshot>) {
        let Some(snapshot) = snapshot else {
            return;
        };

        let mut written = self.written.lock().await;
        if snapshot.generation <= *written {
            debug!(
                "Skipping stale session snapshot (generation {} <= {})",
                snapshot.generation, *written
            );
            return;
        }
        *written = snapshot.generation;

        if let Err(e) = self.storage.write(&self.key, snapshot.record).await {
            warn!("Failed to persist sessions to '{}': {}", self.key, e);
        }
    }
}
