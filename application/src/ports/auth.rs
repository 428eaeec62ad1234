//! Authentication port
//!
//! Supplies the bearer credential attached to every chat request.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from credential lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No signed-in user; nothing to attach.
    #[error("Not signed in")]
    NotSignedIn,

    #[error("{0}")]
    Failed(String),
}

/// Source of the current bearer token.
///
/// Called once per request so that refreshed tokens are picked up.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn token(&self) -> Result<String, AuthError>;
}
