//! # Store Errors
//!
//! Error types for the persistent document store.
//!
//! Every store fault is returned to the caller. A single failed read or
//! write must leave the service usable for the next request.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the document file failed
    #[error("Store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bytes on disk are not a valid serialized document
    #[error("Malformed document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    /// A writer panicked while holding the store lock
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable error code used in structured log lines
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "STORE_IO_ERROR",
            StoreError::MalformedDocument(_) => "STORE_MALFORMED_DOCUMENT",
            StoreError::LockPoisoned => "STORE_LOCK_POISONED",
        }
    }
}
