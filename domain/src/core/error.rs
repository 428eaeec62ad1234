//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid session record: {0}")]
    InvalidRecord(String),
}

impl DomainError {
    /// Check if this error refers to a missing session
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::SessionNotFound(_))
    }
}
