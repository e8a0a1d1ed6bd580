//! Storage configuration.

use serde::{Deserialize, Serialize};

/// File storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data (logs, temp files).
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Root path for uploaded file storage.
    #[serde(default = "default_uploads_root")]
    pub uploads_root: String,
    /// Maximum upload size in bytes (default 1 GB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            uploads_root: default_uploads_root(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_uploads_root() -> String {
    "./data/uploads".to_string()
}

fn default_max_upload() -> u64 {
    1_073_741_824 // 1 GB
}
