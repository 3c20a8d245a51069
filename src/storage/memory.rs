//! In-memory key-value storage.
//!
//! Suitable for tests and embedders that do not need durability.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::KeyValueStorage;
use crate::ClientError;

/// In-memory key-value storage.
///
/// Values live in a `HashMap` protected by a `RwLock`. Cloning the
/// struct shares the underlying map, which lets a test hold a handle
/// to the same storage a store was built on.
///
/// # Note
///
/// Contents are lost when the process exits. For durable storage, use
/// [`FileStorage`](super::FileStorage).
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStorage {
    /// Creates empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let values = self
            .values
            .read()
            .map_err(|_| ClientError::Storage("Lock poisoned".to_owned()))?;

        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.values
            .write()
            .map_err(|_| ClientError::Storage("Lock poisoned".to_owned()))?
            .insert(key.to_owned(), value.to_owned());

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.values
            .write()
            .map_err(|_| ClientError::Storage("Lock poisoned".to_owned()))?
            .remove(key);

        Ok(())
    }
}
