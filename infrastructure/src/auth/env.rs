//! Token read from an environment variable.

use async_trait::async_trait;
use chatline_application::{AuthError, AuthProvider};
use tracing::debug;

/// Provider reading the token from an environment variable on every call,
/// so a refreshed value is picked up without a restart.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl AuthProvider for EnvTokenProvider {
    async fn token(&self) -> Result<String, AuthError> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            Ok(_) | Err(std::env::VarError::NotPresent) => {
                debug!("No token in ${}", self.var);
                Err(AuthError::NotSignedIn)
            }
            Err(std::env::VarError::NotUnicode(_)) => Err(AuthError::Failed(format!(
                "${} is not valid unicode",
                self.var
            ))),
        }
    }
}
