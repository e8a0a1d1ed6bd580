//! Link record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shareable link for one uploaded artifact.
///
/// The `token` is the public handle used in share URLs; `storage_key` is
/// the internal reference to the raw bytes. The two are generated
/// independently so the storage layout never leaks through the public
/// surface and backends can be swapped without invalidating links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Link {
    /// Unique record identifier.
    pub id: Uuid,
    /// Public share token, unique and immutable after creation.
    pub token: String,
    /// Internal storage reference. Never serialized to clients.
    #[serde(skip_serializing)]
    pub storage_key: String,
    /// Name shown to downloaders, distinct from the storage key.
    pub display_name: String,
    /// Artifact size in bytes, set at ingestion.
    pub size_bytes: i64,
    /// Password hash for protected links. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// When the link expires. `None` means the link never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Number of completed, authorized downloads.
    pub download_count: i64,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Whether the link's expiry time has passed as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }

    /// Whether the link requires a password for retrieval.
    pub fn is_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Public share path for this link.
    pub fn share_path(&self) -> String {
        format!("/download?uuid={}", self.token)
    }
}

/// Data required to create a new link record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLink {
    /// Public share token.
    pub token: String,
    /// Internal storage reference.
    pub storage_key: String,
    /// Name shown to downloaders.
    pub display_name: String,
    /// Artifact size in bytes.
    pub size_bytes: i64,
    /// Password hash (None = unprotected).
    pub password_hash: Option<String>,
    /// Expiry time (None = never).
    pub expires_at: Option<DateTime<Utc>>,
}
