//! Service Configuration
//!
//! Defaults are set in code, then overridden by an optional config file and
//! `CHURN__*` environment variables (e.g. `CHURN__SERVER__BIND_ADDR`).

use config::{Config, ConfigError, Environment, File};
use data_validator::ValidationConfig;
use inference_engine::ArtifactPaths;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Config file used when `CHURN_CONFIG` is unset (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config/churn";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0:8080`
    pub bind_addr: String,
    /// Install the Prometheus recorder and serve `/metrics`
    pub enable_metrics: bool,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LoggingConfig {
    /// Parsed level, falling back to INFO
    pub fn max_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactPaths,
    /// Accepted ranges for tenure and the charge fields
    #[serde(default)]
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from `CHURN_CONFIG` (or the default path) plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("CHURN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific file path plus the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let defaults = ArtifactPaths::default();

        Config::builder()
            .set_default("server.bind_addr", "0.0.0.0:8080")?
            .set_default("server.enable_metrics", true)?
            .set_default("artifacts.columns", defaults.columns.to_string_lossy().into_owned())?
            .set_default("artifacts.scaler", defaults.scaler.to_string_lossy().into_owned())?
            .set_default("artifacts.model", defaults.model.to_string_lossy().into_owned())?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("CHURN").separator("__"))
            .build()?
            .try_deserialize()
    }
}
