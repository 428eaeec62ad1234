//! Hand-written port doubles shared by the use case tests.

use crate::ports::chat_transport::{ChatStream, ChatTransport, TransportError};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::key_value_store::{KeyValueStore, StorageError};
use crate::ports::progress::SendProgress;
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::mpsc;

// ==================== Storage ====================

pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
    fail_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            writes: Mutex::new(0),
            fail_reads: false,
        }
    }

    /// Holds `record` but fails every read; writes still succeed.
    pub fn unreadable(key: &str, record: &str) -> Self {
        Self {
            fail_reads: true,
            ..Self::with_record(key, record)
        }
    }

    pub fn with_record(key: &str, record: &str) -> Self {
        let store = Self::new();
        store
            .records
            .lock()
            .unwrap()
            .insert(key.to_string(), record.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.records.lock().unwrap().get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Backend("read timed out".into()));
        }
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.records.lock().unwrap().insert(key.to_string(), value);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Backend("unavailable".into()))
    }

    async fn write(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk full".into()))
    }
}

// ==================== Transport ====================

/// One scripted reply: either rejected up front or a stream.
pub enum Reply {
    Reject(TransportError),
    Stream {
        thread_id: String,
        deltas: Vec<Result<String, TransportError>>,
    },
    /// Deltas arrive through the returned channel; dropping the sender
    /// ends the reply.
    Gated {
        thread_id: String,
        rx: mpsc::UnboundedReceiver<Result<String, TransportError>>,
    },
}

impl Reply {
    pub fn ok(thread_id: &str, deltas: &[&str]) -> Self {
        Reply::Stream {
            thread_id: thread_id.to_string(),
            deltas: deltas.iter().map(|d| Ok(d.to_string())).collect(),
        }
    }

    pub fn gated(thread_id: &str) -> (Self, mpsc::UnboundedSender<Result<String, TransportError>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Reply::Gated {
                thread_id: thread_id.to_string(),
                rx,
            },
            tx,
        )
    }
}

/// Transport answering from a queue of scripted replies and recording
/// each request as `(message, thread_id)`.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(
        &self,
        message: &str,
        thread_id: Option<&str>,
    ) -> Result<ChatStream, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((message.to_string(), thread_id.map(str::to_string)));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Reject(TransportError::Connection("no reply".into())));

        match reply {
            Reply::Reject(e) => Err(e),
            Reply::Stream { thread_id, deltas } => Ok(ChatStream::from_deltas(thread_id, deltas)),
            Reply::Gated { thread_id, rx } => {
                let deltas = futures::stream::unfold(rx, |mut rx| async move {
                    rx.recv().await.map(|delta| (delta, rx))
                });
                Ok(ChatStream::new(thread_id, deltas.boxed()))
            }
        }
    }
}

// ==================== Observers ====================

#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl SendProgress for RecordingProgress {
    fn on_stream_start(&self, _session_id: &str) {
        self.events.lock().unwrap().push("start".into());
    }

    fn on_chunk(&self, _session_id: &str, delta: &str) {
        self.events.lock().unwrap().push(format!("chunk:{delta}"));
    }

    fn on_stream_end(&self, _session_id: &str) {
        self.events.lock().unwrap().push("end".into());
    }

    fn on_failed(&self, _session_id: &str, error: &str) {
        self.events.lock().unwrap().push(format!("failed:{error}"));
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    pub events: Mutex<Vec<&'static str>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event.event_type);
    }
}

/// Yield to other tasks until `condition` holds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
