//! Domain layer for chatline
//!
//! This crate contains the core entities and pure logic of the chat engine.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A session is one conversation thread: an ordered list of messages plus
//! the backend's thread identifier. Sessions live in a bounded,
//! newest-first [`SessionCollection`] that always holds at least one session.
//!
//! ## Stream decoding
//!
//! The backend streams replies as newline-separated `data: ` records.
//! [`StreamDecoder`] turns raw byte buffers into [`StreamChunk`]s regardless
//! of where the buffers were split.

pub mod core;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use core::error::DomainError;
pub use session::{
    collection::{MAX_SESSIONS, SessionCollection},
    decoder::{DATA_PREFIX, DONE_MARKER, ERROR_MARKER, StreamDecoder},
    entities::{Message, Role, Session},
    stream::StreamChunk,
    title::{DEFAULT_SESSION_TITLE, title_from_message},
};
