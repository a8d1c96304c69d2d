//! Durable key-value slots for the persisted cart.
//!
//! The cart is stored as a single JSON string under [`CART_STORAGE_KEY`].
//! Backends only need to get and set strings; they know nothing about carts.

mod file;
mod memory;

pub use file::FileSlot;
pub use memory::MemorySlot;

use async_trait::async_trait;
use thiserror::Error;

/// Key under which the cart snapshot is persisted.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains no characters usable by the backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Get/set of a serialized blob under a string key.
#[async_trait]
pub trait PersistentSlot: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was ever written.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
