use std::sync::Arc;

use tracing::info;

use super::{file_storage::FileStorage, memory_storage::MemoryStorage};
use crate::config::StorageConfig;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The LocalStorage trait abstracts the persisted key/value state of the client
/// (the bearer token and the theme), mirroring the browser's `localStorage`.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    fn describe(&self) -> String;
}

/// Creates a concrete storage implementation based on the StorageConfig.
pub fn create_storage(config: &StorageConfig) -> Arc<dyn LocalStorage> {
    let storage: Arc<dyn LocalStorage> = match config {
        StorageConfig::File(file_config) => Arc::new(FileStorage::new(&file_config.path)),
        StorageConfig::Memory => Arc::new(MemoryStorage::new()),
    };
    info!(
        event_name = "storage.created",
        event_domain = "storage",
        backend = storage.describe().as_str(),
        "local storage ready"
    );
    storage
}
