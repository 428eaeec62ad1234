//! Application layer for chatline
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ChatConfig;
pub use ports::{
    auth::{AuthError, AuthProvider},
    chat_transport::{ChatStream, ChatTransport, DeltaStream, TransportError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    key_value_store::{KeyValueStore, StorageError},
    progress::{NoSendProgress, SendProgress},
};
pub use use_cases::send_message::{ChatCoordinator, ChatError, IgnoreReason, SendOutcome};
pub use use_cases::session_store::{DEFAULT_SESSIONS_KEY, SessionStore};
