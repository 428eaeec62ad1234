//! Token fixed at construction time.

use async_trait::async_trait;
use chatline_application::{AuthError, AuthProvider};

/// Provider returning a fixed token. A blank token means not signed in.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn token(&self) -> Result<String, AuthError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(AuthError::NotSignedIn);
        }
        Ok(token.to_string())
    }
}
