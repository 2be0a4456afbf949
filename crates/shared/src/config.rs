//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Walrus backend configuration.
    #[serde(default)]
    pub walrus: WalrusConfig,
    /// Upload limits.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed for cross-origin requests.
    ///
    /// Empty disables CORS entirely, `*` allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` pair to bind the listener to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Walrus publisher and aggregator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WalrusConfig {
    /// Publisher blob endpoint that accepts `PUT` uploads.
    #[serde(default = "default_publisher_url")]
    pub publisher_url: String,
    /// Aggregator blob endpoint; blobs are read from `<aggregator_url>/<blob_id>`.
    #[serde(default = "default_aggregator_url")]
    pub aggregator_url: String,
    /// Number of epochs the publisher retains each blob for.
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    /// Timeout for outbound requests. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_publisher_url() -> String {
    "https://publisher.walrus-testnet.walrus.space/v1/blobs".to_string()
}

fn default_aggregator_url() -> String {
    "https://aggregator.walrus-testnet.walrus.space/v1/blobs".to_string()
}

fn default_epochs() -> u32 {
    5
}

impl Default for WalrusConfig {
    fn default() -> Self {
        Self {
            publisher_url: default_publisher_url(),
            aggregator_url: default_aggregator_url(),
            epochs: default_epochs(),
            request_timeout_secs: None,
        }
    }
}

/// Upload limits.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
    100 * 1024 * 1024 // 100 MiB
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from config files and environment.
    ///
    /// Precedence, lowest first: built-in defaults, `config/default`,
    /// `config/{RUN_MODE}`, `WALRUS_RELAY__*` variables, then plain `PORT`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("WALRUS_RELAY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Rejects values the relay cannot operate with.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::Message` naming the offending key.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.walrus.epochs == 0 {
            return Err(config::ConfigError::Message(
                "walrus.epochs must be at least 1".to_string(),
            ));
        }
        if self.upload.max_file_size == 0 {
            return Err(config::ConfigError::Message(
                "upload.max_file_size must be greater than 0".to_string(),
            ));
        }
        for (key, url) in [
            ("walrus.publisher_url", &self.walrus.publisher_url),
            ("walrus.aggregator_url", &self.walrus.aggregator_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(config::ConfigError::Message(format!(
                    "{key} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
