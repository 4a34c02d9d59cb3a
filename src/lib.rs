//! Account Store
//!
//! Keeps a small ordered list of LDAP and Local account records in memory
//! and writes the whole list to key-value storage after every change.
//!
//! ## Modules
//!
//! - **types** - `Account` records and the `AccountForm` editing model
//! - **storage** - Key-value backends (memory, JSON files, SQLite)
//! - **store** - `AccountStore`: hydrate, add, update, remove
//! - **common** - Configuration, logging and the root error type
//!
//! ## Example
//!
//! ```rust
//! use account_store::{AccountStore, MemoryStorage};
//!
//! let storage = MemoryStorage::new();
//! let mut store = AccountStore::new(storage.clone());
//! store.hydrate()?;
//!
//! let id = store.add_account()?;
//! assert_eq!(id, "1");
//! # Ok::<(), account_store::StoreError>(())
//! ```

pub mod common;
pub mod storage;
pub mod store;
pub mod types;

// Re-exports: Store
pub use store::{AccountStore, StoreError, StoreResult, DEFAULT_STORAGE_KEY};

// Re-exports: Storage
pub use storage::{
    FileStorage, KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult,
};

// Re-exports: Types
pub use types::{Account, AccountForm, AccountType, FieldErrors, Label};

// Re-exports: Configuration
pub use common::{AppError, StorageBackend, StoreConfig};
