use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::http::{HeaderValue, StatusCode};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/maintenance-gate/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("maintenance-gate").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parses TOML without validating.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The bind address parses and the upstream is an http(s) URL
    /// - The upstream timeout is non-zero
    /// - The response code is a valid HTTP status
    /// - The content type is a valid header value
    /// - Every asset route is an absolute URL path
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.proxy
            .bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ValidationError {
                message: format!("Invalid bind address '{}': {}", self.proxy.bind_addr, e),
            })?;

        let upstream = &self.proxy.upstream;
        if !(upstream.starts_with("http://") || upstream.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!("Upstream '{}' must start with http:// or https://", upstream),
            });
        }

        if self.proxy.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "timeout_seconds must be greater than 0".to_string(),
            });
        }

        let maintenance = &self.maintenance;
        if StatusCode::from_u16(maintenance.http_response_code).is_err() {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "httpResponseCode {} is not a valid HTTP status",
                    maintenance.http_response_code
                ),
            });
        }

        if HeaderValue::from_str(&maintenance.http_content_type).is_err() {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "httpContentType '{}' is not a valid header value",
                    maintenance.http_content_type
                ),
            });
        }

        for (route, asset) in &maintenance.assets {
            if !route.starts_with('/') {
                return Err(ConfigError::ValidationError {
                    message: format!("Asset route '{}' must start with '/'", route),
                });
            }
            if HeaderValue::from_str(&asset.content_type()).is_err() {
                return Err(ConfigError::ValidationError {
                    message: format!("Asset route '{}' has an invalid content type", route),
                });
            }
        }

        Ok(())
    }
}
