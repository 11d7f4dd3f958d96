//! Disk status handler.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::disk::DiskStatus;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

const DISK_CHECK_FAILED: &str = "Disk kontrol edilemedi";

/// Disk status response body.
#[derive(Debug, Serialize)]
pub struct DiskStatusResponse {
    /// `ok` or `busy`.
    pub status: DiskStatus,
}

/// GET /disk - Report whether the upload filesystem has room.
///
/// This is a hint only; no space is reserved for a following upload.
pub async fn disk_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DiskStatusResponse>, ApiError> {
    let status = tokio::task::spawn_blocking(move || state.disk.check())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Disk check task failed");
            ApiError::internal(DISK_CHECK_FAILED)
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to query disk space");
            ApiError::internal(DISK_CHECK_FAILED)
        })?;

    Ok(Json(DiskStatusResponse { status }))
}
