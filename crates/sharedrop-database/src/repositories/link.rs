//! Link repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::store::LinkStore;
use sharedrop_core::types::link::{CreateLink, Link};

/// PostgreSQL-backed store for link records.
#[derive(Debug, Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    /// Create a new link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkStore for LinkRepository {
    async fn insert(&self, link: &CreateLink) -> AppResult<Link> {
        sqlx::query_as::<_, Link>(
            "INSERT INTO links (token, storage_key, display_name, size_bytes, password_hash, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&link.token)
        .bind(&link.storage_key)
        .bind(&link.display_name)
        .bind(link.size_bytes)
        .bind(&link.password_hash)
        .bind(link.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict("Link token already exists");
                }
            }
            AppError::with_source(ErrorKind::Database, "Failed to insert link", e)
        })
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Link>> {
        sqlx::query_as::<_, Link>("SELECT * FROM links WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find link by token", e)
            })
    }

    async fn increment_download_count(&self, token: &str) -> AppResult<i64> {
        // Single UPDATE keeps the increment atomic under concurrent downloads.
        let row: (i64,) = sqlx::query_as(
            "UPDATE links SET download_count = download_count + 1 \
             WHERE token = $1 RETURNING download_count",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment download count", e)
        })?;
        Ok(row.0)
    }
}
