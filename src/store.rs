//! Account Store
//!
//! Holds the ordered account list and the id counter, and mirrors both to
//! key-value storage after every mutation (write-through).
//!
//! # Persisted layout
//!
//! One JSON blob under the store key (default `accounts`):
//!
//! ```json
//! { "accounts": [ { "id": "1", "labels": [], "type": "LDAP", "login": "", "password": null } ],
//!   "nextId": 2 }
//! ```
//!
//! # Failure semantics
//!
//! Mutators change memory first and persist second. When the write fails the
//! error is returned and memory keeps the change; storage holds the previous
//! snapshot until the next successful persist.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::storage::{KeyValueStorage, StorageError};
use crate::types::Account;

/// Storage key used when none is given
pub const DEFAULT_STORAGE_KEY: &str = "accounts";

/// First id issued by an empty store
pub const FIRST_ID: u64 = 1;

/// Account store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Stored blob is not a valid snapshot
    #[error("failed to parse stored accounts: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize accounts: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The id counter cannot advance without wrapping
    #[error("account id counter exhausted after {0}")]
    IdExhausted(u64),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Snapshot written by `persist`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    accounts: &'a [Account],
    next_id: u64,
}

/// Snapshot read by `hydrate`; absent and falsy fields fall back to defaults
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    #[serde(default, deserialize_with = "falsy_as_none")]
    accounts: Option<Vec<Account>>,
    #[serde(default, deserialize_with = "falsy_as_none")]
    next_id: Option<u64>,
}

/// `null`, `false`, `0` and `""` read as absent; anything else must parse as `T`
fn falsy_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let falsy = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    if falsy {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Ordered account list with write-through persistence
pub struct AccountStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    accounts: Vec<Account>,
    next_id: u64,
}

impl<S: KeyValueStorage> AccountStore<S> {
    /// Create an empty store persisting under the default key
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Create an empty store persisting under `key`
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            accounts: Vec::new(),
            next_id: FIRST_ID,
        }
    }

    /// Accounts in creation order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Id the next `add_account` will issue
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load state from storage
    ///
    /// An absent or empty entry leaves the current state as it is. A present
    /// entry replaces both the list and the counter. Nothing is written back.
    pub fn hydrate(&mut self) -> StoreResult<()> {
        let data = match self.storage.get(&self.key)? {
            Some(data) if !data.is_empty() => data,
            _ => {
                tracing::debug!(key = %self.key, "No stored accounts, keeping current state");
                return Ok(());
            }
        };

        let snapshot: Snapshot = serde_json::from_str(&data).map_err(|e| {
            tracing::error!(key = %self.key, error = %e, "Stored accounts are not parseable");
            StoreError::Parse(e)
        })?;

        let accounts = snapshot.accounts.unwrap_or_default();
        let mut next_id = match snapshot.next_id {
            Some(0) | None => FIRST_ID,
            Some(n) => n,
        };

        if let Some(max_id) = accounts.iter().filter_map(Account::numeric_id).max() {
            if next_id <= max_id {
                let advanced = max_id.checked_add(1).ok_or_else(|| {
                    tracing::error!(key = %self.key, max_id, "Stored ids leave no room for new ones");
                    StoreError::IdExhausted(max_id)
                })?;
                tracing::warn!(
                    key = %self.key,
                    stored_next_id = next_id,
                    max_id,
                    "Stored nextId would reissue an existing id, advancing it"
                );
                next_id = advanced;
            }
        }

        {
            let mut seen = HashSet::new();
            for account in &accounts {
                if !seen.insert(account.id.as_str()) {
                    tracing::warn!(key = %self.key, id = %account.id, "Duplicate account id in storage");
                }
            }
        }

        self.accounts = accounts;
        self.next_id = next_id;

        tracing::info!(
            key = %self.key,
            count = self.accounts.len(),
            next_id = self.next_id,
            "Hydrated accounts from storage"
        );

        Ok(())
    }

    /// Write the whole state to storage, replacing the previous snapshot
    pub fn persist(&self) -> StoreResult<()> {
        let snapshot = SnapshotRef {
            accounts: &self.accounts,
            next_id: self.next_id,
        };
        let json = serde_json::to_string(&snapshot).map_err(StoreError::Serialization)?;

        self.storage.set(&self.key, &json).map_err(|e| {
            tracing::error!(key = %self.key, error = %e, "Failed to persist accounts");
            StoreError::Storage(e)
        })?;

        tracing::trace!(key = %self.key, bytes = json.len(), "Persisted accounts");
        Ok(())
    }

    /// Append a blank LDAP account and return its id
    ///
    /// Fails without touching state once the counter cannot advance.
    pub fn add_account(&mut self) -> StoreResult<String> {
        let following = self
            .next_id
            .checked_add(1)
            .ok_or(StoreError::IdExhausted(self.next_id))?;

        let id = self.next_id.to_string();
        self.accounts.push(Account::new(id.clone()));
        self.next_id = following;

        tracing::debug!(id = %id, "Added account");
        self.persist()?;
        Ok(id)
    }

    /// Remove every account with `id`; returns whether any was removed
    ///
    /// Persists even when nothing matched.
    pub fn remove_account(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.accounts.len();
        self.accounts.retain(|a| a.id != id);
        let removed = self.accounts.len() != before;

        tracing::debug!(id, removed, "Removed account");
        self.persist()?;
        Ok(removed)
    }

    /// Replace the account with the same id; returns whether one was replaced
    ///
    /// The record is replaced as a whole, no field merge. An unknown id is a
    /// no-op and does not touch storage.
    pub fn update_account(&mut self, account: Account) -> StoreResult<bool> {
        let Some(slot) = self.accounts.iter_mut().find(|a| a.id == account.id) else {
            tracing::debug!(id = %account.id, "Update for unknown account ignored");
            return Ok(false);
        };

        tracing::debug!(id = %account.id, "Updated account");
        *slot = account;
        self.persist()?;
        Ok(true)
    }
}
