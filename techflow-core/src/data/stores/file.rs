use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::data::store::{KeyValueStore, StoreError};

/// File-backed store: one file per key under a data directory, the local
/// analog of a browser's key-value storage. Whole values are read and
/// rewritten; there is no partial update.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn unavailable(key: &str, err: std::io::Error) -> StoreError {
        StoreError::Unavailable {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::unavailable(key, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|err| Self::unavailable(key, err))?;
        fs::write(self.path_for(key), value).map_err(|err| Self::unavailable(key, err))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::unavailable(key, err)),
        }
    }
}
