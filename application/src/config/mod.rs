//! Application-level configuration.
//!
//! - [`ChatConfig`] — how a streaming reply is reflected into sessions

pub mod chat_config;

pub use chat_config::ChatConfig;
