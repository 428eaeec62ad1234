//! Auth configuration from TOML (`[auth]` section)

use crate::auth::{AuthProviderChain, EnvTokenProvider, StaticTokenProvider};
use chatline_application::AuthProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default environment variable holding the bearer token.
pub const DEFAULT_TOKEN_ENV: &str = "CHATLINE_TOKEN";

/// Raw auth configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuthConfig {
    /// Literal bearer token (takes precedence over `token_env`)
    pub token: Option<String>,
    /// Environment variable read for the token on every request
    pub token_env: String,
}

impl Default for FileAuthConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
        }
    }
}

impl FileAuthConfig {
    /// Provider chain: the configured literal token, then the environment.
    pub fn provider(&self) -> Arc<dyn AuthProvider> {
        let mut chain = AuthProviderChain::new();
        if let Some(token) = &self.token {
            chain = chain.with_provider(Arc::new(StaticTokenProvider::new(token.clone())));
        }
        if !self.token_env.is_empty() {
            chain = chain.with_provider(Arc::new(EnvTokenProvider::new(self.token_env.clone())));
        }
        Arc::new(chain)
    }
}
