use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the client keeps its persisted local state (token, theme).
/// We differentiate the backends via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum StorageConfig {
    /// A JSON document on disk, shared between invocations.
    #[serde(rename = "file")]
    File(FileStorageConfig),
    /// Process-local storage; everything is forgotten on exit.
    #[serde(rename = "memory")]
    Memory,
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FileStorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File(FileStorageConfig {
            path: PathBuf::from("./assignmentpro-storage.json"),
        })
    }
}
