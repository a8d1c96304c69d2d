use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PersistentSlot, StorageError};

/// Process-local slot. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-seeded with one value, as if written by an earlier session.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        Self {
            values: RwLock::new(HashMap::from([(key.to_string(), value.to_string())])),
        }
    }
}

#[async_trait]
impl PersistentSlot for MemorySlot {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
