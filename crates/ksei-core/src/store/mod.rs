//! Durable storage for bearer tokens.
//!
//! Provides the [`CredentialStore`] trait and implementations:
//! - [`FileCredentialStore`] - one JSON file per key in a directory
//! - [`MemoryCredentialStore`] - in-memory (testing)
//!
//! Stores hold opaque strings; the credential manager decides what to put
//! in them and when a stored value is still usable.

mod file;
mod memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value storage for persisted credentials, keyed by username.
pub trait CredentialStore: Send + Sync {
    /// Load the stored value for a key, `None` if nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value for a key, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Name of this storage backend.
    fn name(&self) -> &str {
        "unknown"
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}
