//! Key-value storage adapters
//!
//! Implementations of the [`KeyValueStore`](chatline_application::KeyValueStore)
//! port: a directory of JSON files for normal runs and an in-memory map for
//! tests and ephemeral sessions.

mod file_store;
mod memory_store;

pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
