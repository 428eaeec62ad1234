//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording the chat
//! transcript (user messages, committed replies, failed and cancelled
//! sends) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! transcript in a machine-readable format (JSONL).

use serde_json::{Value, json};

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "user_message", "send_failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn user_message(session_id: &str, thread_id: Option<&str>, content: &str) -> Self {
        Self::new(
            "user_message",
            json!({
                "session_id": session_id,
                "thread_id": thread_id,
                "content": content,
            }),
        )
    }

    pub fn assistant_message(session_id: &str, thread_id: Option<&str>, content: &str) -> Self {
        Self::new(
            "assistant_message",
            json!({
                "session_id": session_id,
                "thread_id": thread_id,
                "content": content,
                "bytes": content.len(),
            }),
        )
    }

    pub fn send_failed(session_id: &str, error: &str) -> Self {
        Self::new(
            "send_failed",
            json!({
                "session_id": session_id,
                "error": error,
            }),
        )
    }

    pub fn send_cancelled(session_id: &str, partial_bytes: usize) -> Self {
        Self::new(
            "send_cancelled",
            json!({
                "session_id": session_id,
                "partial_bytes": partial_bytes,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and infallible; implementations drop records they
/// cannot write.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
