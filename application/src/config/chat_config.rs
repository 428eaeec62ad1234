//! Chat parameters for the send loop.
//!
//! [`ChatConfig`] controls how
//! [`ChatCoordinator`](crate::use_cases::send_message::ChatCoordinator)
//! reflects a streaming reply into the session store.

/// Send loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Show an empty assistant message while the reply streams and fill it
    /// in as deltas arrive. When false the reply appears only on commit.
    pub placeholder: bool,
    /// Write the partial reply to the store after this many deltas.
    /// Must be at least 1.
    pub flush_every: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            placeholder: true,
            flush_every: 1,
        }
    }
}

impl ChatConfig {
    // ==================== Builder Methods ====================

    pub fn with_placeholder(mut self, placeholder: bool) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Zero is treated as 1.
    pub fn with_flush_every(mut self, flush_every: usize) -> Self {
        self.flush_every = flush_every.max(1);
        self
    }
}
