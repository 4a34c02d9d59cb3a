//! Environment-based Configuration
//!
//! # Environment Variables
//!
//! - `ACCOUNTS_STORAGE` - "memory", "file" or "sqlite" (default: "file")
//! - `ACCOUNTS_STORAGE_PATH` - Directory for "file", database path for "sqlite"
//!   (default: "data" / "data/accounts.db")
//! - `ACCOUNTS_STORAGE_KEY` - Key the account list is stored under (default: "accounts")
//! - `ACCOUNTS_LOG_LEVEL` - Logging level (trace, debug, info, warn, error)
//! - `ACCOUNTS_LOG_JSON` - Set to "1" for JSON log output

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};
use crate::store::DEFAULT_STORAGE_KEY;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Which key-value backend to persist through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "file" | "json" => Ok(StorageBackend::File),
            "sqlite" | "db" => Ok(StorageBackend::Sqlite),
            _ => Err(ConfigError::InvalidValue(
                "ACCOUNTS_STORAGE".to_string(),
                format!("unknown backend: {}", s),
            )),
        }
    }
}

impl StorageBackend {
    /// Default location for backends that need one
    pub fn default_path(&self) -> Option<PathBuf> {
        match self {
            StorageBackend::Memory => None,
            StorageBackend::File => Some(PathBuf::from("data")),
            StorageBackend::Sqlite => Some(PathBuf::from("data/accounts.db")),
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Storage backend
    pub backend: StorageBackend,

    /// Backend location (unused for memory)
    pub path: Option<PathBuf>,

    /// Storage key for the account list
    pub key: String,

    /// Log level
    pub log_level: String,

    /// Emit JSON logs
    pub log_json: bool,
}

impl StoreConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration from any variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend: StorageBackend = var("ACCOUNTS_STORAGE")
            .unwrap_or_else(|| "file".to_string())
            .parse()?;

        let path = var("ACCOUNTS_STORAGE_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| backend.default_path());

        let key = var("ACCOUNTS_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "ACCOUNTS_STORAGE_KEY".to_string(),
                "key cannot be empty".to_string(),
            ));
        }

        let log_level = var("ACCOUNTS_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_json = var("ACCOUNTS_LOG_JSON").map(|v| v == "1").unwrap_or(false);

        Ok(Self {
            backend,
            path,
            key,
            log_level,
            log_json,
        })
    }

    /// Open the configured backend
    pub fn open_storage(&self) -> Result<Box<dyn KeyValueStorage>, StorageError> {
        let storage: Box<dyn KeyValueStorage> = match self.backend {
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
            StorageBackend::File => Box::new(FileStorage::new(self.location())),
            StorageBackend::Sqlite => Box::new(SqliteStorage::new(self.location())?),
        };

        tracing::info!(
            backend = ?self.backend,
            path = ?self.path,
            key = %self.key,
            "Opened account storage"
        );

        Ok(storage)
    }

    fn location(&self) -> PathBuf {
        self.path
            .clone()
            .or_else(|| self.backend.default_path())
            .unwrap_or_default()
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("=== Account Store Configuration ===");
        println!("Backend: {:?}", self.backend);
        if let Some(path) = &self.path {
            println!("Path: {}", path.display());
        }
        println!("Key: {}", self.key);
        println!("Log Level: {}", self.log_level);
        println!("JSON Logs: {}", self.log_json);
        println!("===================================");
    }
}
