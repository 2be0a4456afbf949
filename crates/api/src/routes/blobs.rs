//! Blob upload and retrieval routes.

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Path, State,
        multipart::MultipartRejection,
        rejection::PathRejection,
    },
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{error, info, warn};
use walrus_relay_core::storage::{BlobStore, BlobUpload, StorageError};
use walrus_relay_shared::{AppError, BlobId};

use crate::{AppState, error::ApiError, upload::parse_upload};

/// Room for multipart framing and the address field on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Creates the blob routes.
pub fn routes<S: BlobStore + 'static>(max_file_size: u64) -> Router<AppState<S>> {
    let body_limit =
        usize::try_from(max_file_size.saturating_add(MULTIPART_OVERHEAD)).unwrap_or(usize::MAX);

    Router::new()
        .route(
            "/upload",
            post(upload_blob::<S>).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/retrieve/", get(missing_blob_id))
        .route("/retrieve/{blob_id}", get(retrieve_blob::<S>))
}

/// Response for a stored blob.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Backend-assigned blob identifier.
    #[serde(rename = "blobId")]
    pub blob_id: BlobId,
}

/// POST `/upload`
/// Relay a multipart file upload to the Walrus publisher.
async fn upload_blob<S: BlobStore>(
    State(state): State<AppState<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "Upload is not a multipart request");
        AppError::Validation(rejection.body_text())
    })?;

    let parsed = parse_upload(&mut multipart, state.upload.max_file_size).await?;
    info!(
        address = %parsed.address,
        file_size = parsed.data.len(),
        chunks = parsed.chunks,
        "Upload stream read"
    );

    let upload = BlobUpload {
        address: parsed.address,
        data: parsed.data,
    };
    let stored = state
        .store
        .store(upload)
        .await
        .map_err(|e| AppError::UploadRejected {
            reason: e.backend_payload().cloned(),
        })?;

    info!(
        blob_id = %stored.blob_id,
        status = stored.status.as_str(),
        "Blob stored"
    );

    Ok(Json(UploadResponse {
        blob_id: stored.blob_id,
    }))
}

/// GET `/retrieve/{blob_id}`
/// Stream a stored blob back as raw bytes.
///
/// Every failure is reported to the client as not found; the log keeps the
/// actual cause.
async fn retrieve_blob<S: BlobStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(blob_id) = path.map_err(|rejection| {
        warn!(kind = "malformed_id", error = %rejection, "Blob id could not be decoded");
        AppError::NotFound
    })?;

    match state.store.read(&blob_id).await {
        Ok(bytes) => Ok(([(CONTENT_TYPE, "application/octet-stream")], bytes).into_response()),
        Err(e) => {
            match &e {
                StorageError::NotFound { .. } => {
                    warn!(blob_id = %blob_id, kind = e.kind(), "Blob not found");
                }
                _ => {
                    error!(blob_id = %blob_id, kind = e.kind(), error = %e, "Blob retrieval failed");
                }
            }
            Err(AppError::NotFound.into())
        }
    }
}

/// GET `/retrieve/` with an empty blob id.
async fn missing_blob_id() -> ApiError {
    warn!(kind = "missing_id", "Retrieval without a blob id");
    AppError::NotFound.into()
}
