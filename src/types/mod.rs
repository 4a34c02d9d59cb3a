//! Shared Types Module
//!
//! Persisted account records and the transient form view model.

pub mod account;
pub mod form;

// Re-exports for convenience
pub use account::{Account, AccountType, Label};
pub use form::{AccountForm, FieldErrors, MAX_CREDENTIAL_LEN, MAX_LABELS_INPUT_LEN};
