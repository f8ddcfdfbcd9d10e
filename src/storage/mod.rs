use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub mod file;

/// Failure reported by an [`OverrideStorage`] implementation.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Storage slot key cannot be empty")]
    EmptyKey,

    #[error("Creating the storage file in `{0}` failed: {1}")]
    Create(std::path::PathBuf, std::io::Error),

    #[error("Writing storage to `{0}` failed: {1}")]
    Write(std::path::PathBuf, std::io::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),

    #[error("{0}")]
    Other(String),
}

/// A client-side storage API holding string slots, used to persist flag overrides
/// and the inspector's filter text.
pub trait OverrideStorage: Sync + Send {
    /// Gets the value of the slot identified by the given `key`.
    fn read(&self, key: &str) -> Option<String>;

    /// Writes the given `value` into the slot identified by the given `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory [`OverrideStorage`]. Clones share the same slots, which lets a test or an
/// embedding application simulate a restart by handing the same storage to a new client.
#[derive(Clone, Default, Debug)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverrideStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::EmptyKey);
        }
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod memory_storage_tests {
    use crate::{MemoryStorage, OverrideStorage};

    #[test]
    fn clones_share_slots() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.write("k", "v").unwrap();
        assert_eq!(other.read("k").unwrap(), "v");
        other.write("k", "w").unwrap();
        assert_eq!(storage.read("k").unwrap(), "w");
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(MemoryStorage::new().write("", "v").is_err());
    }
}
