//! Shared types, errors, and configuration for Walrus Relay.
//!
//! This crate provides common types used across all other crates:
//! - Validated Walrus destination addresses
//! - Opaque blob identifiers
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ServerConfig, UploadConfig, WalrusConfig};
pub use error::AppError;
pub use types::{AddressError, BlobId, WalrusAddress};
