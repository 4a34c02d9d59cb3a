//! Common Infrastructure Module
//!
//! This module contains:
//! - Configuration loading from environment variables
//! - Structured logging setup
//! - The root error type

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{ConfigError, StorageBackend, StoreConfig};
pub use error::{AppError, Result};
pub use logging::{
    init_from_config, init_logging, log_store_event, ErrorDetails, EventCategory, LogEvent,
    LogLevel, LoggingError,
};
