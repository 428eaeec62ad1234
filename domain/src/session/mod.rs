//! Chat session domain.
//!
//! - [`entities::Session`] — one persisted conversation thread
//! - [`entities::Message`] — a single message within a session
//! - [`collection::SessionCollection`] — bounded, newest-first set of sessions
//! - [`decoder::StreamDecoder`] — incremental decoder for streamed replies

pub mod collection;
pub mod decoder;
pub mod entities;
pub mod stream;
pub mod title;
