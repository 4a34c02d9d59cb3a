//! Common Error Types
//!
//! Root error for the `accounts` binary and anything that drives the store
//! end to end.

use thiserror::Error;

use crate::storage::StorageError;
use crate::store::StoreError;

/// Root error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Logging errors
    #[error("logging error: {0}")]
    Logging(#[from] super::logging::LoggingError),

    /// Store errors (parse, serialization, write-through)
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Backend errors outside a store operation, e.g. while opening
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Requested account does not exist
    #[error("account not found: {0}")]
    NotFound(String),

    /// Validation errors
    #[error("validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get error code for logs and CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Logging(_) => "LOGGING_ERROR",
            AppError::Store(StoreError::Parse(_)) => "PARSE_ERROR",
            AppError::Store(StoreError::Serialization(_)) => "SERIALIZATION_ERROR",
            AppError::Store(StoreError::Storage(_)) | AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Store(StoreError::IdExhausted(_)) => "ID_EXHAUSTED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
