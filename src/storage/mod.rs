//! Local Key-Value Storage
//!
//! The cart persists a single named record into a small synchronous
//! key-value store, the server-side counterpart of browser local storage.
//! Two backends are provided:
//! - `MemoryStorage` (process lifetime only)
//! - `FileStorage` (one file per key inside a directory)

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be mapped onto the backend (e.g. path separators).
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The underlying medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstraction over durable key-value storage backends.
///
/// Operations are synchronous and expected to be fast enough to run inline
/// after every cart mutation.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`, `None` when absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Succeeds when the key does not exist.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
