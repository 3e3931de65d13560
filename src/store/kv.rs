//! Key-value storage interface.
//!
//! The system of record is a flat string-to-JSON map, the server-side
//! analogue of the browser storage the original deployment used. All
//! operations are synchronous and the last write to a key wins; there is
//! no cross-process locking.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

pub trait KvStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a key-value pair, replacing any existing value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys starting with the given prefix, sorted.
    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
