//! Upload and download handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use sharedrop_core::error::AppError;
use sharedrop_service::IngestRequest;

use crate::dto::request::DownloadQuery;
use crate::dto::response::UploadResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/files/upload — multipart upload.
///
/// Fields: `file` (required), `password` (optional), `expires_in`
/// (optional, seconds). The bytes are written to storage under a fresh
/// key before ingestion; if ingestion fails the orphaned bytes are
/// deleted best-effort and the error is surfaced.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file_name: Option<String> = None;
    let mut data: Option<Bytes> = None;
    let mut password: Option<String> = None;
    let mut expires_in: Option<i64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            "password" => {
                password = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            "expires_in" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                if !text.trim().is_empty() {
                    expires_in = Some(
                        text.trim()
                            .parse::<i64>()
                            .map_err(|_| AppError::validation("expires_in must be an integer"))?,
                    );
                }
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::validation("file is required"))?;
    let display_name = file_name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("file name is required"))?;

    if data.len() as u64 > state.config.storage.max_upload_size_bytes {
        return Err(AppError::validation(format!(
            "File exceeds maximum upload size of {} bytes",
            state.config.storage.max_upload_size_bytes
        ))
        .into());
    }

    // The storage key is generated here, independently of the public
    // token the ingestion service will mint.
    let storage_key = Uuid::new_v4().simple().to_string();
    let size_bytes = data.len() as i64;

    state.storage.write(&storage_key, data).await?;

    let result = state
        .ingest_service
        .ingest(IngestRequest {
            storage_key: storage_key.clone(),
            display_name,
            size_bytes,
            password,
            expires_in_seconds: expires_in,
        })
        .await;

    match result {
        Ok(link) => Ok(Json(UploadResponse {
            download_page: link.share_path(),
        })),
        Err(e) => {
            if let Err(cleanup_err) = state.storage.delete(&storage_key).await {
                warn!(error = %cleanup_err, "Failed to clean up orphaned upload");
            }
            Err(e.into())
        }
    }
}

/// GET /download?uuid=<token>&password=... — public download.
pub async fn download_file(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let download = state
        .retrieve_service
        .retrieve(&query.uuid, query.password.as_deref())
        .await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&download.display_name),
        )
        .header(header::CONTENT_LENGTH, download.size_bytes)
        .body(Body::from_stream(download.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// Builds a Content-Disposition header value for an arbitrary file name.
///
/// Quotes, backslashes, control characters, and non-ASCII characters
/// would produce a malformed or unconstructible header value, so they
/// are replaced before the name is quoted.
fn content_disposition(display_name: &str) -> String {
    let safe: String = display_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}
