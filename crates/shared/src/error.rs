//! Application-wide error types.

use thiserror::Error;

/// Application error types.
///
/// The `Display` text of each variant is the message returned to clients.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client input is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The uploaded file stream could not be read to completion.
    #[error("Error reading file stream")]
    Stream,

    /// The uploaded file exceeds the configured maximum.
    #[error("File too large")]
    PayloadTooLarge {
        /// Configured maximum in bytes.
        max: u64,
    },

    /// The storage backend refused or failed an upload.
    #[error("Upload rejected")]
    UploadRejected {
        /// Backend error payload, forwarded when available.
        reason: Option<serde_json::Value>,
    },

    /// The requested blob could not be served.
    #[error("File not found")]
    NotFound,
}

impl AppError {
    /// Address is missing or does not match the Walrus address format.
    #[must_use]
    pub fn invalid_address() -> Self {
        Self::Validation("Invalid/missing address".to_string())
    }

    /// No file part was present in the upload.
    #[must_use]
    pub fn missing_file() -> Self {
        Self::Validation("No file uploaded".to_string())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Stream => 400,
            Self::NotFound => 404,
            Self::PayloadTooLarge { .. } => 413,
            Self::UploadRejected { .. } => 500,
        }
    }

    /// Returns the error code used in logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Stream => "STREAM_ERROR",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::UploadRejected { .. } => "UPLOAD_REJECTED",
            Self::NotFound => "NOT_FOUND",
        }
    }

    /// Builds the JSON body sent to clients.
    ///
    /// Always carries `error`; `reason` is present only for rejected uploads
    /// whose backend payload was captured.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({ "error": self.to_string() });
        if let Self::UploadRejected {
            reason: Some(reason),
        } = self
        {
            body["reason"] = reason.clone();
        }
        body
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
