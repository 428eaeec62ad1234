//! Bearer token providers
//!
//! Implementations of the [`AuthProvider`](chatline_application::AuthProvider)
//! port. [`AuthProviderChain`] composes them: providers are tried in order
//! until one yields a token.

mod chain;
mod env;
mod static_token;

pub use chain::AuthProviderChain;
pub use env::EnvTokenProvider;
pub use static_token::StaticTokenProvider;
