//! Storage error types.

use thiserror::Error;

/// Storage backend errors.
///
/// Kinds stay distinct even where the HTTP layer collapses them into a
/// single client-facing status.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or the exchange broke off.
    #[error("storage backend unreachable: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("storage backend returned HTTP {status}")]
    Rejected {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error payload, when the backend sent one.
        body: Option<serde_json::Value>,
    },

    /// The requested blob does not exist.
    #[error("blob not found: {blob_id}")]
    NotFound {
        /// Blob identifier that was not found.
        blob_id: String,
    },

    /// The backend answered with a body that could not be interpreted.
    #[error("malformed storage backend response: {0}")]
    MalformedResponse(String),

    /// Client configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(blob_id: impl Into<String>) -> Self {
        Self::NotFound {
            blob_id: blob_id.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Short machine-readable name of the error kind, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Rejected { .. } => "rejected",
            Self::NotFound { .. } => "not_found",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Backend payload worth forwarding to the client, if any.
    #[must_use]
    pub fn backend_payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Rejected { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else if err.is_builder() {
            Self::Configuration(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
