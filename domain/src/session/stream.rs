//! Streaming events decoded from a chat response body.
//!
//! [`StreamChunk`] represents one protocol event in the streamed reply,
//! enabling the assistant message to be filled in as it is generated.

/// One decoded protocol event. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// A fragment of assistant text, appended in arrival order.
    TextDelta(String),
    /// The backend reported a failure; carries the message after the marker.
    Error(String),
    /// The backend finished the reply.
    Done,
}

impl StreamChunk {
    /// Returns true if no chunk may follow this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamChunk::Error(_) | StreamChunk::Done)
    }
}
