use thiserror::Error;

/// A backend failure is unrecoverable for the operation in progress and is
/// propagated to the caller, never swallowed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable for key '{key}': {message}")]
    Unavailable { key: String, message: String },

    #[error("stored value under key '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },

    #[error("failed to encode value for key '{key}': {message}")]
    Encode { key: String, message: String },
}

/// String key-value storage, the substrate under the repository and the
/// session manager. Synchronous by design: a single actor serializes all
/// access within one process. Concurrent writers from other processes are
/// last-write-wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
