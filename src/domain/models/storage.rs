use std::sync::Arc;

use anyhow::Result;

/// A durable key-value medium for persisted sessions.
pub trait Storage {
    /// Returns `None` when nothing has been stored under `key` yet.
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a key that does not exist is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

pub type StorageBox = Arc<dyn Storage + Send + Sync>;
