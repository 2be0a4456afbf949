//! API route definitions.

use axum::Router;
use walrus_relay_core::storage::BlobStore;

use crate::AppState;

pub mod blobs;
pub mod health;

/// Creates the API router with all routes.
///
/// `max_file_size` sizes the request body limit on the upload route.
pub fn api_routes<S: BlobStore + 'static>(max_file_size: u64) -> Router<AppState<S>> {
    Router::new()
        .merge(health::routes::<S>())
        .merge(blobs::routes::<S>(max_file_size))
}
