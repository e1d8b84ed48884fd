//! Error types for persistence and storage

use thiserror::Error;

/// Errors raised by a [`StateStore`](crate::storage::StateStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached (no window, storage disabled).
    #[error("storage is unavailable")]
    Unavailable,

    /// A write was rejected (quota exceeded, private mode, injected failure).
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    /// A read was rejected by the backend.
    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },
}

/// Errors surfaced by the persisting reducer and its helpers.
#[derive(Debug, Error)]
pub enum PersistError {
    /// State or projection could not be turned into JSON.
    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration was malformed.
    #[error("invalid persistence config: {0}")]
    Config(String),

    /// A stored record exists but does not parse.
    #[error("record under '{key}' is not valid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = PersistError> = std::result::Result<T, E>;
