//! Storage backend access for the relay.
//!
//! The backend is a Walrus deployment reached over HTTP:
//!
//! ```text
//! ┌──────────────┐  PUT <publisher>?epochs=N&send_object_to=0x..  ┌───────────┐
//! │ WalrusClient │ ─────────────────────────────────────────────▶ │ Publisher │
//! │              │  GET <aggregator>/<blob_id>                    ├───────────┤
//! │              │ ─────────────────────────────────────────────▶ │Aggregator │
//! └──────────────┘                                                └───────────┘
//! ```

mod config;
mod error;
mod response;
mod service;

pub use config::StorageConfig;
pub use error::StorageError;
pub use response::{BlobStatus, PublisherResponse, StoredBlob};
pub use service::{BlobStore, BlobUpload, UPLOAD_CONTENT_TYPE, UPLOAD_FILE_NAME, WalrusClient};
