//! File-based key-value storage.
//!
//! Stores each key as a file in a directory.

use std::path::PathBuf;

use async_trait::async_trait;

use super::KeyValueStorage;
use crate::ClientError;

/// File-based key-value storage.
///
/// Each key is stored as `{key}.val` in the configured directory.
/// Keys are restricted to ASCII alphanumerics, `_`, and `-` (the
/// well-known keys all fit) so a key can never escape the directory.
///
/// # Example
///
/// ```rust,ignore
/// use skillmart::storage::FileStorage;
///
/// let storage = FileStorage::new("/var/lib/myapp/state")?;
/// ```
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Creates file storage rooted at `directory`.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let dir = directory.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| ClientError::Storage(format!("Failed to create storage directory: {e}")))?;
        Ok(Self { directory: dir })
    }

    fn validate_key(key: &str) -> Result<(), ClientError> {
        let ok = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if ok {
            Ok(())
        } else {
            Err(ClientError::InvalidKey(key.to_owned()))
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.val"))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Self::validate_key(key)?;

        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| ClientError::Storage(format!("Failed to read value file: {e}")))?;

        Ok(Some(content))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        Self::validate_key(key)?;

        std::fs::write(self.key_path(key), value)
            .map_err(|e| ClientError::Storage(format!("Failed to write value file: {e}")))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientError> {
        Self::validate_key(key)?;

        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| ClientError::Storage(format!("Failed to delete value file: {e}")))?;
        }

        Ok(())
    }
}
