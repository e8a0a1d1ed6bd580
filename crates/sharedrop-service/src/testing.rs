//! In-memory test doubles for the link store and storage provider.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use sharedrop_auth::CredentialGuard;
use sharedrop_core::config::auth::AuthConfig;
use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::storage::{ByteStream, StorageProvider};
use sharedrop_core::traits::store::LinkStore;
use sharedrop_core::types::link::{CreateLink, Link};

/// Credential guard with minimal cost parameters, for fast tests.
pub fn test_guard() -> CredentialGuard {
    CredentialGuard::new(&AuthConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

/// In-memory link store keyed by token.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    links: RwLock<HashMap<String, Link>>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backdate or extend a stored link's expiry.
    pub fn set_expires_at(&self, token: &str, expires_at: DateTime<Utc>) {
        let mut links = self.links.write().unwrap();
        links
            .get_mut(token)
            .expect("unknown token in test")
            .expires_at = Some(expires_at);
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn insert(&self, link: &CreateLink) -> AppResult<Link> {
        let mut links = self.links.write().unwrap();
        if links.contains_key(&link.token) {
            return Err(AppError::conflict("Link token already exists"));
        }
        let stored = Link {
            id: Uuid::new_v4(),
            token: link.token.clone(),
            storage_key: link.storage_key.clone(),
            display_name: link.display_name.clone(),
            size_bytes: link.size_bytes,
            password_hash: link.password_hash.clone(),
            expires_at: link.expires_at,
            download_count: 0,
            created_at: Utc::now(),
        };
        links.insert(stored.token.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Link>> {
        Ok(self.links.read().unwrap().get(token).cloned())
    }

    async fn increment_download_count(&self, token: &str) -> AppResult<i64> {
        let mut links = self.links.write().unwrap();
        let link = links
            .get_mut(token)
            .ok_or_else(|| AppError::database("Unknown token"))?;
        link.download_count += 1;
        Ok(link.download_count)
    }
}

/// Store whose first insert fails with a token conflict.
#[derive(Debug, Default)]
pub struct ConflictOnceStore {
    inner: MemoryLinkStore,
    attempts: AtomicU32,
}

impl ConflictOnceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkStore for ConflictOnceStore {
    async fn insert(&self, link: &CreateLink) -> AppResult<Link> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(AppError::conflict("Link token already exists"));
        }
        self.inner.insert(link).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Link>> {
        self.inner.find_by_token(token).await
    }

    async fn increment_download_count(&self, token: &str) -> AppResult<i64> {
        self.inner.increment_download_count(token).await
    }
}

/// Store whose download-count increment always fails.
pub struct FailingIncrementStore {
    inner: std::sync::Arc<MemoryLinkStore>,
}

impl FailingIncrementStore {
    pub fn new(inner: std::sync::Arc<MemoryLinkStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LinkStore for FailingIncrementStore {
    async fn insert(&self, link: &CreateLink) -> AppResult<Link> {
        self.inner.insert(link).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Link>> {
        self.inner.find_by_token(token).await
    }

    async fn increment_download_count(&self, _token: &str) -> AppResult<i64> {
        Err(AppError::database("Increment unavailable"))
    }
}

/// In-memory byte storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop stored bytes without going through the trait.
    pub async fn remove(&self, key: &str) {
        self.objects.write().unwrap().remove(key);
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read(&self, key: &str) -> AppResult<ByteStream> {
        let data = self.read_bytes(key).await?;
        Ok(Box::pin(futures::stream::iter(vec![Ok(data)])))
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        self.objects
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::not_found("Stored bytes not found"))
    }

    async fn write(&self, key: &str, data: Bytes) -> AppResult<()> {
        self.objects.write().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.write().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.objects.read().unwrap().contains_key(key))
    }
}
