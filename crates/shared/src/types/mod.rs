//! Common types used across the application.

pub mod address;
pub mod blob_id;

pub use address::{AddressError, WalrusAddress};
pub use blob_id::BlobId;
