//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Query parameters for the public download endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadQuery {
    /// Public share token.
    pub uuid: String,
    /// Password for protected links.
    pub password: Option<String>,
}
