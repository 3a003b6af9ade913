//! # Runtime Configuration
//!
//! Layered configuration for the service binary.
//!
//! Values resolve in three layers: compiled defaults, then an optional
//! `config/default.toml` file, then `APP__`-prefixed environment
//! variables (`APP__SERVER__PORT=8080` targets `server.port`). A `.env`
//! file is honored before the environment is read.
//!
//! # Examples
//!
//! ```no_run
//! use restaurant_sync::config::AppConfig;
//!
//! let cfg = AppConfig::load()?;
//! println!("listening on {}", cfg.server.bind_address());
//! # Ok::<(), config::ConfigError>(())
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Upstream feed settings.
    pub feeds: FeedsConfig,
    /// Graph store settings.
    pub store: StoreConfig,
    /// Recommendation miner bounds.
    pub recommendations: RecommendationsConfig,
    /// Log output settings.
    pub log: LogConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl ServerConfig {
    /// Returns the `host:port` pair for the TCP listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    /// Base URL of the feed endpoints.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Graph store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the Dgraph HTTP API.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Recommendation miner bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsConfig {
    /// Suggestions returned per buyer.
    pub max_recommendations: usize,
    /// Co-purchase transactions probed per buyer.
    pub max_co_transactions: usize,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl AppConfig {
    /// Loads configuration from defaults, the optional config file, and
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a source cannot be read or a value
    /// does not deserialize.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 9000)?
            .set_default("feeds.base_url", "https://kqxty15mpg.execute-api.us-east-1.amazonaws.com")?
            .set_default("feeds.timeout_ms", 10_000)?
            .set_default("store.base_url", "http://localhost:8080")?
            .set_default("store.timeout_ms", 60_000)?
            .set_default("recommendations.max_recommendations", 10)?
            .set_default("recommendations.max_co_transactions", 10)?
            .set_default("log.json", false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn from_defaults() -> AppConfig {
        AppConfig::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_cover_every_section() {
        let cfg = from_defaults();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.feeds.timeout_ms, 10_000);
        assert!(cfg.store.base_url.starts_with("http://"));
        assert_eq!(cfg.recommendations.max_recommendations, 10);
        assert!(!cfg.log.json);
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let cfg = from_defaults();
        assert_eq!(cfg.server.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn overrides_replace_single_keys() {
        let cfg: AppConfig = AppConfig::builder()
            .unwrap()
            .set_override("server.port", 9090)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.server.port, 9090);
    }
}
