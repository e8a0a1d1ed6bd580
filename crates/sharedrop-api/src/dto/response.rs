//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Successful upload response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Public share path for the uploaded file.
    pub download_page: String,
}
