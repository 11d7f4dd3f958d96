//! File upload handler.

use axum::extract::{multipart::MultipartRejection, Multipart, State};
use std::sync::Arc;

use crate::file::{is_media_file, sanitize_filename};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::Authorized;

/// Multipart field carrying the payload.
pub const FILE_FIELD: &str = "file";

const FILE_MISSING: &str = "Dosya alınamadı";
const MEDIA_ONLY: &str = "Sadece fotoğraf veya video yükleyebilirsiniz";
const DIR_FAILED: &str = "Yükleme klasörü oluşturulamadı";
const SAVE_FAILED: &str = "Dosya kaydedilemedi";

/// POST /upload - Store an image or video.
///
/// Request: `Authorization: Bearer <token>` and a multipart/form-data body
/// with a `file` field. The payload is streamed to
/// `{upload dir}/{random hex}_{filename}`; on any failure nothing is kept.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Authorized(_token): Authorized,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected non-multipart upload: {}", e);
        ApiError::bad_request(FILE_MISSING)
    })?;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to read multipart field: {}", e);
        ApiError::bad_request(FILE_MISSING)
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let raw_name = field
            .file_name()
            .ok_or_else(|| ApiError::bad_request(FILE_MISSING))?;
        let filename = sanitize_filename(raw_name).map_err(|e| {
            tracing::debug!("Rejected upload filename: {}", e);
            ApiError::bad_request(FILE_MISSING)
        })?;

        if !is_media_file(&filename) {
            tracing::warn!(filename = %filename, "Rejected upload with disallowed type");
            return Err(ApiError::bad_request(MEDIA_ONLY));
        }

        state.storage.ensure_dir().await.map_err(|e| {
            tracing::error!(
                dir = %state.storage.dir().display(),
                error = %e,
                "Failed to create upload directory"
            );
            ApiError::internal(DIR_FAILED)
        })?;

        let mut upload = state.storage.create(&filename).await.map_err(|e| {
            tracing::error!(filename = %filename, error = %e, "Failed to create upload file");
            ApiError::internal(SAVE_FAILED)
        })?;

        // Dropping `upload` on any early return removes the partial file.
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => upload.write_chunk(&chunk).await.map_err(|e| {
                    tracing::error!(
                        stored_name = %upload.stored_name(),
                        error = %e,
                        "Failed to write upload"
                    );
                    ApiError::internal(SAVE_FAILED)
                })?,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(
                        stored_name = %upload.stored_name(),
                        received = upload.written(),
                        "Upload body interrupted: {}",
                        e
                    );
                    return Err(ApiError::bad_request(FILE_MISSING));
                }
            }
        }

        let stored = upload.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to finalize upload");
            ApiError::internal(SAVE_FAILED)
        })?;

        tracing::info!(
            stored_name = %stored.stored_name,
            size = stored.size,
            "File uploaded"
        );

        return Ok(format!("Dosya yüklendi: {}", stored.stored_name));
    }

    Err(ApiError::bad_request(FILE_MISSING))
}
