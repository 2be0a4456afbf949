//! Storage client configuration.

use std::time::Duration;

use reqwest::Url;
use walrus_relay_shared::WalrusConfig;

use super::error::StorageError;

/// Walrus client configuration with parsed endpoints.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Publisher blob endpoint (`PUT`).
    pub publisher_url: Url,
    /// Aggregator blob endpoint; blob ids are appended as a path segment.
    pub aggregator_url: Url,
    /// Retention in epochs requested for every upload.
    pub epochs: u32,
    /// Timeout applied to every outbound request.
    pub request_timeout: Option<Duration>,
}

impl StorageConfig {
    /// Default retention: 5 epochs.
    pub const DEFAULT_EPOCHS: u32 = 5;

    /// Create a config for the given endpoints with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL does not parse or cannot take path segments.
    pub fn new(publisher_url: &str, aggregator_url: &str) -> Result<Self, StorageError> {
        let publisher_url = parse_url("publisher", publisher_url)?;
        let aggregator_url = parse_url("aggregator", aggregator_url)?;
        if aggregator_url.cannot_be_a_base() {
            return Err(StorageError::configuration(
                "aggregator URL cannot take a blob id path segment",
            ));
        }

        Ok(Self {
            publisher_url,
            aggregator_url,
            epochs: Self::DEFAULT_EPOCHS,
            request_timeout: None,
        })
    }

    /// Build from the application's Walrus section.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is invalid.
    pub fn from_walrus_config(config: &WalrusConfig) -> Result<Self, StorageError> {
        let mut storage = Self::new(&config.publisher_url, &config.aggregator_url)?
            .with_epochs(config.epochs);
        if let Some(secs) = config.request_timeout_secs {
            storage = storage.with_timeout(Duration::from_secs(secs));
        }
        Ok(storage)
    }

    /// Set retention epochs.
    #[must_use]
    pub fn with_epochs(mut self, epochs: u32) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set outbound request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

fn parse_url(which: &str, raw: &str) -> Result<Url, StorageError> {
    Url::parse(raw)
        .map_err(|e| StorageError::configuration(format!("invalid {which} URL '{raw}': {e}")))
}
