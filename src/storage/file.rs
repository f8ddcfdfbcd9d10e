use crate::storage::{OverrideStorage, StorageError};
use crate::utils::sha1;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// [`OverrideStorage`] that keeps each slot in its own file inside a directory.
///
/// File names are the SHA-1 of the slot key, so any key is a valid file name.
/// Writes go to a temporary file first and are then moved over the slot file.
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Creates a new [`FileStorage`], creating `directory` if it doesn't exist.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| StorageError::Create(directory.clone(), e))?;
        Ok(Self { directory })
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", sha1(key)))
    }
}

impl OverrideStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.slot_path(key)).ok()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::EmptyKey);
        }
        let location = self.slot_path(key);
        let mut tempfile = tempfile::NamedTempFile::new_in(&self.directory)
            .map_err(|e| StorageError::Create(self.directory.clone(), e))?;
        tempfile
            .write_all(value.as_bytes())
            .map_err(|e| StorageError::Write(tempfile.path().into(), e))?;
        tempfile.persist(&location)?;
        log::trace!("Storage slot persisted to {}", location.display());
        Ok(())
    }
}

#[cfg(test)]
mod file_storage_tests {
    use crate::{FileStorage, OverrideStorage};

    #[test]
    fn round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.write("flag-overrides", r#"{"a":true}"#).unwrap();
        assert_eq!(storage.read("flag-overrides").unwrap(), r#"{"a":true}"#);

        let reopened = FileStorage::new(dir.path()).unwrap();
        assert_eq!(reopened.read("flag-overrides").unwrap(), r#"{"a":true}"#);
    }

    #[test]
    fn keys_with_path_characters() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.write("../../etc/passwd", "x").unwrap();
        assert_eq!(storage.read("../../etc/passwd").unwrap(), "x");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_slot_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(storage.read("nothing").is_none());
        storage.write("k", "v").unwrap();
        storage.write("k", "w").unwrap();
        assert_eq!(storage.read("k").unwrap(), "w");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
