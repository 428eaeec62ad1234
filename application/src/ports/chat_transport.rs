//! Chat transport port
//!
//! Defines the interface for sending one user message to the chat backend
//! and receiving the assistant reply as a stream of text deltas.

use super::auth::AuthError;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use thiserror::Error;

/// Errors that can occur while talking to the chat backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No credential is available; the user has to sign in first.
    #[error("Sign-in required")]
    AuthRequired,

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The backend answered with a non-success status.
    /// Carries the backend-supplied message or a generic fallback.
    #[error("{0}")]
    Rejected(String),

    /// The backend reported a failure inside the response stream.
    #[error("{0}")]
    Stream(String),

    #[error("{0}")]
    InvalidResponse(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<AuthError> for TransportError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotSignedIn => TransportError::AuthRequired,
            AuthError::Failed(msg) => TransportError::Auth(msg),
        }
    }
}

/// Boxed stream of text deltas. Ends after the last delta or after the
/// first error.
pub type DeltaStream = BoxStream<'static, Result<String, TransportError>>;

/// An accepted chat request: the conversation thread the backend assigned,
/// plus the reply as it arrives.
pub struct ChatStream {
    thread_id: String,
    deltas: DeltaStream,
}

impl ChatStream {
    pub fn new(thread_id: impl Into<String>, deltas: DeltaStream) -> Self {
        Self {
            thread_id: thread_id.into(),
            deltas,
        }
    }

    /// A stream over already-known deltas (buffered replies, tests).
    pub fn from_deltas(
        thread_id: impl Into<String>,
        deltas: Vec<Result<String, TransportError>>,
    ) -> Self {
        Self::new(thread_id, futures::stream::iter(deltas).boxed())
    }

    /// Thread id resolved when the response arrived. Empty when neither the
    /// backend nor the caller supplied one.
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Receive the next delta. `None` means the reply is complete.
    pub async fn next_delta(&mut self) -> Option<Result<String, TransportError>> {
        self.deltas.next().await
    }

    /// Collect all deltas into the full reply text.
    pub async fn collect_text(mut self) -> Result<String, TransportError> {
        let mut text = String::new();
        while let Some(delta) = self.next_delta().await {
            text.push_str(&delta?);
        }
        Ok(text)
    }
}

impl std::fmt::Debug for ChatStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStream")
            .field("thread_id", &self.thread_id)
            .finish_non_exhaustive()
    }
}

/// Gateway to the chat backend
///
/// `send` resolves once the backend has accepted the request (success
/// status received). The returned stream then yields the reply deltas in
/// arrival order.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `message` within `thread_id` (or a new thread when `None`).
    async fn send(
        &self,
        message: &str,
        thread_id: Option<&str>,
    ) -> Result<ChatStream, TransportError>;
}
