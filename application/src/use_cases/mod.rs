//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod send_message;
pub mod session_store;

#[cfg(test)]
pub(crate) mod test_support;
