//! Multipart upload parsing.
//!
//! Reads the destination address and the first file part out of an upload
//! request. The address is checked before any file bytes are read, and the
//! file is buffered up to the configured maximum.

use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};
use walrus_relay_shared::{AppError, WalrusAddress};

/// Multipart field carrying the destination address.
pub const ADDRESS_FIELD: &str = "walrusUploadAddress";

/// A validated, fully buffered upload.
#[derive(Debug)]
pub struct ParsedUpload {
    /// Destination address.
    pub address: WalrusAddress,
    /// File contents.
    pub data: Bytes,
    /// Number of chunks the file arrived in.
    pub chunks: usize,
}

/// Parses an upload request.
///
/// Fields after the file part are not read.
///
/// # Errors
///
/// - `Validation` if the address is missing/invalid or no file part exists
/// - `Stream` if the body cannot be read
/// - `PayloadTooLarge` if the file exceeds `max_file_size`
pub async fn parse_upload(
    multipart: &mut Multipart,
    max_file_size: u64,
) -> Result<ParsedUpload, AppError> {
    let mut raw_address: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(stream_error(&e, max_file_size)),
        };

        if field.file_name().is_some() {
            let address = validate_address(raw_address.as_deref())?;
            let (data, chunks) = read_file(field, max_file_size).await?;
            return Ok(ParsedUpload {
                address,
                data,
                chunks,
            });
        }

        if field.name() == Some(ADDRESS_FIELD) {
            let text = field
                .text()
                .await
                .map_err(|e| stream_error(&e, max_file_size))?;
            raw_address = Some(text);
        }
    }

    validate_address(raw_address.as_deref())?;
    Err(AppError::missing_file())
}

fn validate_address(raw: Option<&str>) -> Result<WalrusAddress, AppError> {
    let raw = raw.ok_or_else(AppError::invalid_address)?;
    WalrusAddress::parse(raw).map_err(|e| {
        debug!(reason = %e, "Rejected upload address");
        AppError::invalid_address()
    })
}

async fn read_file(mut field: Field<'_>, max_file_size: u64) -> Result<(Bytes, usize), AppError> {
    let mut buffer = BytesMut::new();
    let mut chunks = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| stream_error(&e, max_file_size))?
    {
        let total = buffer.len() as u64 + chunk.len() as u64;
        if total > max_file_size {
            return Err(AppError::PayloadTooLarge { max: max_file_size });
        }
        buffer.extend_from_slice(&chunk);
        chunks += 1;
    }

    Ok((buffer.freeze(), chunks))
}

/// Maps a multipart read failure. Body-limit hits become `PayloadTooLarge`.
fn stream_error(err: &MultipartError, max_file_size: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge { max: max_file_size };
    }
    warn!(error = %err, "Failed to read upload stream");
    AppError::Stream
}
