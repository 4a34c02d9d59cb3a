//! Storage Layer Module
//!
//! Key-value backends the account store persists through.
//!
//! This module contains:
//! - The `KeyValueStorage` trait and its error type
//! - In-memory implementation for tests and throwaway sessions
//! - File implementation (one JSON file per key)
//! - SQLite implementation for durable local storage

pub mod file;
pub mod memory;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::{KeyValueStorage, StorageError, StorageResult};

#[cfg(test)]
pub use traits::MockKeyValueStorage;
