//! Link retrieval service — enforces the access policy and hands back
//! the byte stream.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use sharedrop_auth::CredentialGuard;
use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::storage::{ByteStream, StorageProvider};
use sharedrop_core::traits::store::LinkStore;

/// A successfully authorized download.
pub struct Download {
    /// Stream over the stored bytes.
    pub stream: ByteStream,
    /// Name to present to the client.
    pub display_name: String,
    /// Size in bytes, for the Content-Length header.
    pub size_bytes: i64,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("display_name", &self.display_name)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}

/// Looks up links by token and enforces expiry and password policy.
#[derive(Clone)]
pub struct RetrieveService {
    /// Link record store.
    store: Arc<dyn LinkStore>,
    /// Byte storage backend.
    storage: Arc<dyn StorageProvider>,
    /// Password verifier for protected links.
    guard: Arc<CredentialGuard>,
}

impl std::fmt::Debug for RetrieveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrieveService").finish()
    }
}

impl RetrieveService {
    /// Creates a new retrieval service.
    pub fn new(
        store: Arc<dyn LinkStore>,
        storage: Arc<dyn StorageProvider>,
        guard: Arc<CredentialGuard>,
    ) -> Self {
        Self {
            store,
            storage,
            guard,
        }
    }

    /// Retrieves the bytes behind a token, enforcing the access policy.
    ///
    /// Policy order: lookup, expiry, password. Each check short-circuits
    /// with its own error kind. Expired records are left in place;
    /// cleanup is an external policy.
    pub async fn retrieve(
        &self,
        token: &str,
        supplied_password: Option<&str>,
    ) -> AppResult<Download> {
        let link = self
            .store
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found"))?;

        if link.is_expired(Utc::now()) {
            return Err(AppError::expired("Link has expired"));
        }

        if let Some(ref hash) = link.password_hash {
            let supplied = match supplied_password {
                Some(p) if !p.is_empty() => p,
                _ => return Err(AppError::password_required("Password required")),
            };
            if !self.guard.verify(supplied, hash) {
                return Err(AppError::password_incorrect("Incorrect password"));
            }
        }

        // Open the stream before counting so an I/O failure cannot
        // consume a download count.
        let stream = self.storage.read(&link.storage_key).await?;

        // A lost count must never block a legitimate download; report
        // and carry on.
        match self.store.increment_download_count(&link.token).await {
            Ok(count) => debug!(token = %link.token, count, "Download count incremented"),
            Err(e) => warn!(token = %link.token, error = %e, "Failed to persist download count"),
        }

        Ok(Download {
            stream,
            display_name: link.display_name,
            size_bytes: link.size_bytes,
        })
    }
}
