//! Upload ingestion service — turns a durably stored upload into a
//! shareable link record.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use sharedrop_auth::CredentialGuard;
use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::store::LinkStore;
use sharedrop_core::types::link::{CreateLink, Link};

use crate::token::TokenGenerator;

/// Attempts before giving up on token-uniqueness conflicts. With
/// 128-bit tokens a single conflict already indicates something is
/// badly wrong, so the bound is tight.
const MAX_TOKEN_ATTEMPTS: u32 = 3;

/// Request to ingest one uploaded artifact.
///
/// The raw bytes must already be durably written under `storage_key`
/// before ingestion; this service only creates the link record.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Storage key assigned by the upload layer.
    pub storage_key: String,
    /// Name shown to downloaders.
    pub display_name: String,
    /// Artifact size in bytes.
    pub size_bytes: i64,
    /// Optional link password (empty string means no password).
    pub password: Option<String>,
    /// Optional lifetime in seconds (values <= 0 mean no expiry).
    pub expires_in_seconds: Option<i64>,
}

/// Creates link records for uploaded artifacts.
#[derive(Clone)]
pub struct IngestService {
    /// Link record store.
    store: Arc<dyn LinkStore>,
    /// Token generator.
    tokens: TokenGenerator,
    /// Password hasher for protected links.
    guard: Arc<CredentialGuard>,
}

impl std::fmt::Debug for IngestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestService").finish()
    }
}

impl IngestService {
    /// Creates a new ingestion service.
    pub fn new(store: Arc<dyn LinkStore>, tokens: TokenGenerator, guard: Arc<CredentialGuard>) -> Self {
        Self {
            store,
            tokens,
            guard,
        }
    }

    /// Ingests one uploaded artifact and returns the created link.
    ///
    /// Exactly one record is created on success; on failure nothing is
    /// persisted and the caller must treat the upload as failed (the
    /// orphaned bytes are the upload layer's cleanup responsibility).
    pub async fn ingest(&self, req: IngestRequest) -> AppResult<Link> {
        if req.storage_key.is_empty() {
            return Err(AppError::validation("Storage key must not be empty"));
        }
        if req.display_name.is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }
        if req.size_bytes < 0 {
            return Err(AppError::validation("File size must not be negative"));
        }

        // An empty password means "no password"; it never reaches the
        // hasher. The plaintext is dropped with the request.
        let password_hash = match req.password.as_deref() {
            None | Some("") => None,
            Some(plaintext) => Some(self.guard.hash(plaintext)?),
        };

        // Client-supplied seconds can be anything up to i64::MAX;
        // out-of-range values are a validation failure, not a panic.
        let expires_at = match req.expires_in_seconds.filter(|secs| *secs > 0) {
            None => None,
            Some(secs) => {
                let expires = Duration::try_seconds(secs)
                    .and_then(|delta| Utc::now().checked_add_signed(delta))
                    .ok_or_else(|| AppError::validation("Expiry is out of range"))?;
                Some(expires)
            }
        };

        // The unique index on token is the backstop for the (negligible)
        // chance of a random collision; retry with a fresh token.
        let mut attempts = 0;
        let link = loop {
            attempts += 1;
            let create = CreateLink {
                token: self.tokens.generate(),
                storage_key: req.storage_key.clone(),
                display_name: req.display_name.clone(),
                size_bytes: req.size_bytes,
                password_hash: password_hash.clone(),
                expires_at,
            };

            match self.store.insert(&create).await {
                Ok(link) => break link,
                Err(e) if e.kind == ErrorKind::Conflict && attempts < MAX_TOKEN_ATTEMPTS => {
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            token = %link.token,
            size_bytes = link.size_bytes,
            protected = link.is_protected(),
            expires_at = ?link.expires_at,
            "Link created"
        );

        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ConflictOnceStore, MemoryLinkStore, test_guard};
    use sharedrop_core::error::ErrorKind;

    fn service(store: Arc<dyn LinkStore>) -> IngestService {
        IngestService::new(store, TokenGenerator::new(), Arc::new(test_guard()))
    }

    fn request() -> IngestRequest {
        IngestRequest {
            storage_key: "key-1".to_string(),
            display_name: "report.pdf".to_string(),
            size_bytes: 1024,
            password: None,
            expires_in_seconds: None,
        }
    }

    #[tokio::test]
    async fn test_ingest_creates_record() {
        let store = Arc::new(MemoryLinkStore::new());
        let link = service(store.clone()).ingest(request()).await.unwrap();

        assert_eq!(link.display_name, "report.pdf");
        assert_eq!(link.size_bytes, 1024);
        assert_eq!(link.download_count, 0);
        assert!(link.password_hash.is_none());
        assert!(link.expires_at.is_none());

        let stored = store.find_by_token(&link.token).await.unwrap().unwrap();
        assert_eq!(stored.storage_key, "key-1");
    }

    #[tokio::test]
    async fn test_token_independent_of_storage_key() {
        let store = Arc::new(MemoryLinkStore::new());
        let link = service(store).ingest(request()).await.unwrap();
        assert_ne!(link.token, link.storage_key);
        assert!(!link.token.contains("key-1"));
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let store: Arc<dyn LinkStore> = Arc::new(MemoryLinkStore::new());

        let mut no_name = request();
        no_name.display_name = String::new();
        let err = service(store.clone()).ingest(no_name).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let mut negative = request();
        negative.size_bytes = -1;
        let err = service(store.clone()).ingest(negative).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let mut no_key = request();
        no_key.storage_key = String::new();
        let err = service(store).ingest(no_key).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let store = Arc::new(MemoryLinkStore::new());
        let mut req = request();
        req.password = Some("secret".to_string());

        let link = service(store).ingest(req).await.unwrap();
        let hash = link.password_hash.unwrap();
        assert_ne!(hash, "secret");
        assert!(!hash.contains("secret"));
        assert!(test_guard().verify("secret", &hash));
    }

    #[tokio::test]
    async fn test_empty_password_means_unprotected() {
        let store = Arc::new(MemoryLinkStore::new());
        let mut req = request();
        req.password = Some(String::new());

        let link = service(store).ingest(req).await.unwrap();
        assert!(!link.is_protected());
    }

    #[tokio::test]
    async fn test_expiry_computed_from_seconds() {
        let store = Arc::new(MemoryLinkStore::new());
        let mut req = request();
        req.expires_in_seconds = Some(3600);

        let before = Utc::now();
        let link = service(store).ingest(req).await.unwrap();
        let expires_at = link.expires_at.unwrap();

        let lower = before + Duration::seconds(3599);
        let upper = Utc::now() + Duration::seconds(3601);
        assert!(expires_at > lower && expires_at < upper);
    }

    #[tokio::test]
    async fn test_out_of_range_expiry_rejected() {
        let store = Arc::new(MemoryLinkStore::new());
        let mut req = request();
        req.expires_in_seconds = Some(i64::MAX);

        let err = service(store).ingest(req).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_zero_expiry_means_never() {
        let store = Arc::new(MemoryLinkStore::new());
        let mut req = request();
        req.expires_in_seconds = Some(0);

        let link = service(store).ingest(req).await.unwrap();
        assert!(link.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_conflict_retries_with_fresh_token() {
        let store = Arc::new(ConflictOnceStore::new());
        let link = service(store.clone()).ingest(request()).await.unwrap();
        assert!(!link.token.is_empty());
        assert_eq!(store.insert_attempts(), 2);
    }

    #[tokio::test]
    async fn test_sequential_tokens_unique() {
        let store = Arc::new(MemoryLinkStore::new());
        let service = service(store);
        let mut tokens = std::collections::HashSet::new();
        for _ in 0..100 {
            let link = service.ingest(request()).await.unwrap();
            assert!(tokens.insert(link.token));
        }
    }
}
