//! Core logic for Walrus Relay.
//!
//! This crate talks to the Walrus storage backend and knows nothing about
//! the inbound HTTP server. The api crate depends on the [`storage::BlobStore`]
//! seam so tests can substitute their own backend.
//!
//! # Modules
//!
//! - `storage` - Publisher uploads, aggregator reads, and their error kinds

pub mod storage;
