//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The upload and retrieval routes
//! - A health check
//! - JSON error responses
//! - CORS and request tracing layers

pub mod error;
pub mod routes;
pub mod upload;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use walrus_relay_core::storage::{BlobStore, StorageConfig, StorageError, WalrusClient};
use walrus_relay_shared::{AppConfig, UploadConfig};

pub use error::ApiError;

/// Application state shared across handlers.
pub struct AppState<S> {
    /// Storage backend the relay forwards to.
    pub store: Arc<S>,
    /// Upload limits.
    pub upload: UploadConfig,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            upload: self.upload.clone(),
        }
    }
}

impl<S: BlobStore> AppState<S> {
    /// Creates state around an already constructed backend.
    pub fn new(store: S, upload: UploadConfig) -> Self {
        Self {
            store: Arc::new(store),
            upload,
        }
    }
}

impl AppState<WalrusClient> {
    /// Builds state with a Walrus client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Walrus endpoints are invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        let storage_config = StorageConfig::from_walrus_config(&config.walrus)?;
        let client = WalrusClient::from_config(storage_config)?;
        Ok(Self::new(client, config.upload.clone()))
    }
}

/// Creates the main application router.
///
/// `allowed_origins` controls CORS: empty adds no CORS layer, `*` allows any
/// origin, anything else is an explicit allow-list.
pub fn create_router<S: BlobStore + 'static>(
    state: AppState<S>,
    allowed_origins: &[String],
) -> Router {
    let router =
        routes::api_routes::<S>(state.upload.max_file_size).layer(TraceLayer::new_for_http());

    let router = match cors_layer(allowed_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

/// Builds the CORS layer for the configured origins, if any.
pub fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    if allowed_origins.is_empty() {
        return None;
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    Some(cors.allow_origin(AllowOrigin::list(origins)))
}
