//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health — database and storage reachability.
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let database = sharedrop_database::connection::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let storage = state.storage.health_check().await.unwrap_or(false);

    let status = if database && storage { "ok" } else { "degraded" };

    Ok(Json(serde_json::json!({
        "status": status,
        "database": database,
        "storage": storage,
    })))
}
