//! Error taxonomy of the link registry and its storage port.

use thiserror::Error;

/// Errors surfaced by [`crate::application::services::LinkRegistry`].
///
/// `InvalidInput` and `NotFound` are expected, caller-recoverable outcomes.
/// `PersistenceFailure` means the operation did not happen at all: the
/// in-memory registry never runs ahead of durable state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("short link not found: {0}")]
    NotFound(String),
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

/// Errors raised by [`crate::domain::repositories::LinkStore`] backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
    #[error("failed to serialize links: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for RegistryError {
    fn from(value: StoreError) -> Self {
        Self::PersistenceFailure(value.to_string())
    }
}
