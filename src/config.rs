use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Helius API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the enriched-transactions API
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// API key; usually supplied via --api-key or HELIUS_API_KEY instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Export defaults, overridable per run from the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Path to the wallets.json address list
    pub wallets_path: String,
    /// CSV output path
    pub output_path: String,
    /// Maximum in-window transactions fetched per wallet
    pub limit: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.helius.xyz/v0".to_string(),
            timeout_seconds: 30,
            api_key: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            wallets_path: "wallets.json".to_string(),
            output_path: "output.csv".to_string(),
            limit: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables.
    /// Environment variables take precedence over file values.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file().unwrap_or_default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if !Path::new(&config_path).exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| ConfigError::FileNotFound(config_path.clone()))?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parsing(e.to_string()))?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(key) = env::var("HELIUS_API_KEY") {
            self.api.api_key = Some(key);
        }
        if let Ok(endpoint) = env::var("HELIUS_ENDPOINT") {
            self.api.endpoint = endpoint;
        }
        if let Ok(timeout) = env::var("HELIUS_TIMEOUT_SECONDS") {
            self.api.timeout_seconds =
                timeout.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "HELIUS_TIMEOUT_SECONDS".to_string(),
                    value: timeout,
                })?;
        }

        if let Ok(wallets) = env::var("EXPORT_WALLETS") {
            self.export.wallets_path = wallets;
        }
        if let Ok(output) = env::var("EXPORT_OUTPUT") {
            self.export.output_path = output;
        }
        if let Ok(limit) = env::var("EXPORT_LIMIT") {
            self.export.limit = limit.parse().map_err(|_| ConfigError::InvalidValue {
                key: "EXPORT_LIMIT".to_string(),
                value: limit,
            })?;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.endpoint.starts_with("http://") && !self.api.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(self.api.endpoint.clone()));
        }

        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
            return Err(ConfigError::InvalidValue {
                key: "api.timeout_seconds".to_string(),
                value: self.api.timeout_seconds.to_string(),
            });
        }

        if self.export.limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "export.limit".to_string(),
                value: self.export.limit.to_string(),
            });
        }

        if self.export.wallets_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "export.wallets_path".to_string(),
                value: self.export.wallets_path.clone(),
            });
        }

        if self.export.output_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "export.output_path".to_string(),
                value: self.export.output_path.clone(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample_config() -> Result<String, ConfigError> {
        let config = Self::default();
        toml::to_string_pretty(&config).map_err(|e| ConfigError::Parsing(e.to_string()))
    }
}
