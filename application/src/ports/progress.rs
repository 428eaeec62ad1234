//! Progress notification port
//!
//! Defines the interface for observing a send while the reply streams in.

/// Callbacks during a single send.
///
/// Implementations live in the presentation layer (e.g. printing deltas to
/// the terminal as they arrive). All methods default to no-ops.
pub trait SendProgress: Send + Sync {
    /// The backend accepted the request and the reply is about to stream.
    fn on_stream_start(&self, _session_id: &str) {}

    /// A text delta was appended to the reply.
    fn on_chunk(&self, _session_id: &str, _delta: &str) {}

    /// The reply completed and was committed.
    fn on_stream_end(&self, _session_id: &str) {}

    /// The send failed and the session was rolled back.
    fn on_failed(&self, _session_id: &str, _error: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoSendProgress;

impl SendProgress for NoSendProgress {}
