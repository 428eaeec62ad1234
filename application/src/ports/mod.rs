//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod auth;
pub mod chat_transport;
pub mod conversation_logger;
pub mod key_value_store;
pub mod progress;
