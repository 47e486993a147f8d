//! Error types for the Hearth operational store.

use std::path::PathBuf;

use hearth_core::Category;
use thiserror::Error;

/// Result type alias for store and codec operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while encoding keys or talking to the store.
#[derive(Debug, Error)]
pub enum StateError {
    /// Malformed input handed to the key codec. A caller bug; never retried.
    #[error("invalid key component: {0}")]
    InvalidKeyComponent(String),

    /// A stored key whose timestamp suffix does not decode.
    #[error("malformed timestamp in key {key:?}: {reason}")]
    MalformedTimestamp { key: String, reason: String },

    /// The database could not be opened or an I/O operation failed.
    #[error("store unavailable ({op}): {reason}")]
    StoreUnavailable { op: &'static str, reason: String },

    #[error("namespace {0} was not opened on this store")]
    NamespaceNotOpen(Category),

    #[error("failed to read seed file {path:?}: {reason}")]
    SeedFile { path: PathBuf, reason: String },
}

impl StateError {
    /// True for failures of the storage layer itself, as opposed to bad
    /// keys or bad records.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StateError::StoreUnavailable { .. })
    }
}
