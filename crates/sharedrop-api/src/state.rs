//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use sharedrop_core::config::AppConfig;
use sharedrop_core::traits::storage::StorageProvider;
use sharedrop_service::{IngestService, RetrieveService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool (health checks only).
    pub db_pool: PgPool,
    /// Byte storage backend.
    pub storage: Arc<dyn StorageProvider>,
    /// Upload ingestion service.
    pub ingest_service: Arc<IngestService>,
    /// Link retrieval service.
    pub retrieve_service: Arc<RetrieveService>,
}
