//! Walrus Relay Server
//!
//! Main entry point for the upload/retrieval gateway.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use walrus_relay_api::{AppState, create_router};
use walrus_relay_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walrus_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Create Walrus client and application state
    let state = AppState::from_config(&config).context("Failed to configure Walrus client")?;
    info!(
        publisher = %config.walrus.publisher_url,
        aggregator = %config.walrus.aggregator_url,
        epochs = config.walrus.epochs,
        max_file_size = config.upload.max_file_size,
        "Walrus backend configured"
    );

    // Create router
    let app = create_router(state, &config.server.allowed_origins);

    // Start server
    let addr = config.server.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %addr, error = %e, "Failed to bind listener");
            return Err(e).context(format!("Failed to bind {addr}"));
        }
    };
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
