//! Publisher response model.
//!
//! A publisher answers a store request in one of two shapes:
//!
//! ```json
//! { "newlyCreated": { "blobObject": { "blobId": "..." , ... }, ... } }
//! { "alreadyCertified": { "blobId": "...", ... } }
//! ```

use serde::Deserialize;
use walrus_relay_shared::BlobId;

use super::error::StorageError;

/// Raw publisher reply to a `PUT` store request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherResponse {
    /// Present when the blob was already stored and certified.
    #[serde(default)]
    pub already_certified: Option<AlreadyCertified>,
    /// Present when this upload created the blob.
    #[serde(default)]
    pub newly_created: Option<NewlyCreated>,
}

/// `alreadyCertified` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlreadyCertified {
    /// Identifier of the existing blob.
    pub blob_id: String,
    /// Epoch at which the existing blob expires.
    #[serde(default)]
    pub end_epoch: Option<u64>,
}

/// `newlyCreated` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewlyCreated {
    /// The on-chain blob object.
    pub blob_object: BlobObject,
    /// Storage cost charged for the upload.
    #[serde(default)]
    pub cost: Option<u64>,
}

/// On-chain blob object inside `newlyCreated`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobObject {
    /// Identifier of the new blob.
    pub blob_id: String,
    /// Unencoded blob size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

/// How the publisher satisfied a store request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobStatus {
    /// This upload created the blob.
    NewlyCreated,
    /// An identical blob was already certified.
    AlreadyCertified,
}

impl BlobStatus {
    /// Returns the status as the publisher spells it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewlyCreated => "newlyCreated",
            Self::AlreadyCertified => "alreadyCertified",
        }
    }
}

/// A successfully stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Backend-assigned identifier.
    pub blob_id: BlobId,
    /// Whether the blob was created or already present.
    pub status: BlobStatus,
}

impl PublisherResponse {
    /// Extracts the blob id, preferring `alreadyCertified` over `newlyCreated`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when neither shape is present.
    pub fn into_stored_blob(self) -> Result<StoredBlob, StorageError> {
        if let Some(certified) = self.already_certified {
            return Ok(StoredBlob {
                blob_id: BlobId::new(certified.blob_id),
                status: BlobStatus::AlreadyCertified,
            });
        }

        self.newly_created
            .map(|created| StoredBlob {
                blob_id: BlobId::new(created.blob_object.blob_id),
                status: BlobStatus::NewlyCreated,
            })
            .ok_or_else(|| {
                StorageError::malformed("neither alreadyCertified nor newlyCreated present")
            })
    }
}
