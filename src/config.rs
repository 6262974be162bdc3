//! Configuration module for Filedrop.

use serde::Deserialize;
use std::path::Path;

use crate::{FiledropError, Result};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on (required, usually supplied via `PORT`).
    #[serde(default)]
    pub port: Option<u16>,
    /// CORS allowed origins. Empty means any origin is allowed.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum request body size in megabytes. Unset means no limit.
    #[serde(default)]
    pub max_request_size_mb: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            cors_origins: vec![],
            max_request_size_mb: None,
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded files (required, usually supplied via `UPLOAD_DIR`).
    #[serde(default)]
    pub upload_dir: Option<String>,
    /// Maximum number of file parts accepted in one upload request.
    #[serde(default = "default_max_files_per_upload")]
    pub max_files_per_upload: usize,
    /// Accept filenames containing path separators or parent references.
    #[serde(default)]
    pub allow_path_separators: bool,
}

fn default_max_files_per_upload() -> usize {
    10
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: None,
            max_files_per_upload: default_max_files_per_upload(),
            allow_path_separators: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console output is always enabled.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FiledropError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from an optional TOML file and apply environment overrides.
    ///
    /// A missing file is not an error: the service can be configured entirely
    /// through `PORT` and `UPLOAD_DIR`.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FiledropError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: listening port
    /// - `UPLOAD_DIR`: storage directory
    /// - `FILEDROP_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored. A `PORT` that does not parse as a port number
    /// is a [`FiledropError::Config`] error naming the value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(port) = lookup("PORT") {
            let port = port
                .parse()
                .map_err(|e| FiledropError::Config(format!("invalid PORT {port:?}: {e}")))?;
            self.server.port = Some(port);
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            self.storage.upload_dir = Some(dir);
        }
        if let Some(level) = lookup("FILEDROP_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the port is not set
    /// - the upload directory is not set
    /// - the per-request file cap is zero
    pub fn validate(&self) -> Result<()> {
        if self.server.port.is_none() {
            return Err(FiledropError::Config(
                "port is not set. Set server.port in config.toml or the PORT environment variable."
                    .to_string(),
            ));
        }
        if self.storage.upload_dir.as_deref().map_or(true, str::is_empty) {
            return Err(FiledropError::Config(
                "upload directory is not set. Set storage.upload_dir in config.toml \
                 or the UPLOAD_DIR environment variable."
                    .to_string(),
            ));
        }
        if self.storage.max_files_per_upload == 0 {
            return Err(FiledropError::Config(
                "storage.max_files_per_upload must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
