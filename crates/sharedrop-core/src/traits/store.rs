//! Persistence seam for link records.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::link::{CreateLink, Link};

/// Persistence capability for link records.
///
/// The store is injected into the ingestion and retrieval services; no
/// module-level connection state exists. Implementations must enforce
/// token uniqueness on insert and make the download-count increment
/// atomic with respect to concurrent increments on the same record.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Insert a new link record and return the persisted row.
    ///
    /// A duplicate token must fail with [`ErrorKind::Conflict`] so the
    /// caller can retry with a fresh token.
    ///
    /// [`ErrorKind::Conflict`]: crate::error::ErrorKind::Conflict
    async fn insert(&self, link: &CreateLink) -> AppResult<Link>;

    /// Point lookup by public token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Link>>;

    /// Atomically increment the download count for a token.
    ///
    /// Returns the new count. N concurrent successful calls must raise
    /// the count by exactly N.
    async fn increment_download_count(&self, token: &str) -> AppResult<i64>;
}
