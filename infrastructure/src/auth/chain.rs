//! Provider chain: first credential found wins.

use async_trait::async_trait;
use chatline_application::{AuthError, AuthProvider};
use std::sync::Arc;

/// Tries providers in order until one succeeds.
///
/// When every provider fails, the last error is returned; an empty chain
/// is not signed in.
#[derive(Default)]
pub struct AuthProviderChain {
    providers: Vec<Arc<dyn AuthProvider>>,
}

impl AuthProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the end of the chain.
    pub fn with_provider(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.providers.push(provider);
        self
    }

}

#[async_trait]
impl AuthProvider for AuthProviderChain {
    async fn token(&self) -> Result<String, AuthError> {
        let mut last_error = AuthError::NotSignedIn;
        for provider in &self.providers {
            match provider.token().await {
                Ok(token) => return Ok(token),
                Err(e) => last_error = e,
            }
        }
        Err(last_error)
    }
}
