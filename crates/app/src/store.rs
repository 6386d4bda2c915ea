//! Durable client state
//!
//! Key/value storage for the session mirror. Values are JSON documents written as one file per
//! key, so a storefront and a console sharing a state directory never clobber each other as
//! long as they use separate subdirectories.

use std::{collections::HashMap, fs, io, path::PathBuf};

use mockall::automock;
use thiserror::Error;

/// Errors raised by a [`SessionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a key failed.
    #[error("failed to access stored {key:?}")]
    Io {
        /// Key being accessed.
        key: String,

        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Key/value store for session data.
#[automock]
pub trait SessionStore: Send {
    /// Read a key, `None` when it was never written or has been removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the value exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a key.
    ///
    /// # Errors
    ///
    /// Returns an error when the value cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the value exists but cannot be removed.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// [`SessionStore`] keeping each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        key: key.to_string(),
        source,
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error(key)(error)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(io_error(key))?;
        fs::write(self.path(key), value).map_err(io_error(key))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(io_error(key)(error)),
            _ => Ok(()),
        }
    }
}

/// In-memory [`SessionStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);

        Ok(())
    }
}
