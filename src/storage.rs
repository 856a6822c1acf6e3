use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {key}: {source}")]
    Read { key: String, source: io::Error },
    #[error("failed to write {key}: {source}")]
    Write { key: String, source: io::Error },
}

/// Key-value persistence. Values are whole blobs; a write overwrites the
/// previous value for the key.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: Storage> Storage for &T {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        T::read(*self, key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        T::write(*self, key, value)
    }
}

/// One file per key inside the data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.dir.join(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Read {
                key: key.to_string(),
                source: err,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.dir.join(key), value).map_err(|err| StorageError::Write {
            key: key.to_string(),
            source: err,
        })
    }
}
