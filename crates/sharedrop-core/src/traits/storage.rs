//! Storage provider trait for pluggable byte storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for byte storage backends.
///
/// Keys are opaque strings assigned by the upload layer; the provider
/// stores and retrieves bytes under them. Aborted reads must leave the
/// stored bytes intact.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read the bytes under a key as a stream.
    async fn read(&self, key: &str) -> AppResult<ByteStream>;

    /// Read the bytes under a key into memory as a complete byte vector.
    async fn read_bytes(&self, key: &str) -> AppResult<Bytes>;

    /// Write bytes under a key.
    async fn write(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Delete the bytes under a key. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether bytes exist under a key.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
