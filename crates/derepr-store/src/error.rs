//! Error types for store operations.

use derepr_canonical::CanonicalError;
use derepr_journal::JournalError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key is not present. Carries a printable form of the encoded key.
    #[error("key not found: {0}")]
    NotFound(String),
    /// Key or value encoding failed.
    #[error("canonical error: {0}")]
    Canonical(#[from] CanonicalError),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),
    /// JSON value encoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Stored bytes could not be decoded.
    #[error("corrupt entry: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub(crate) fn not_found(key: &[u8]) -> Self {
        StoreError::NotFound(String::from_utf8_lossy(key).into_owned())
    }
}
