//! # Constellation Configuration
//!
//! Unified configuration for the bus, the directory and the module cache.
//!
//! ## Security Requirements
//!
//! - `secret_key` is wiped from memory on drop and never printed
//! - All timeouts and limits have sane defaults with override capability

use cn_01_message_bus::BusConfig;
use cn_02_module_directory::DirectoryConfig;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use zeroize::Zeroizing;

/// Complete process configuration.
#[derive(Clone, Default)]
pub struct ConstellationConfig {
    /// Package identifier of this application.
    pub package_identifier: String,
    /// Secret key the directory signature is derived from.
    pub secret_key: Zeroizing<String>,
    /// Message bus configuration.
    pub bus: BusConfig,
    /// Remote directory configuration.
    pub directory: DirectoryConfig,
    /// Module cache configuration.
    pub storage: StorageConfig,
}

/// Module cache configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// JSON cache file. `None` keeps the cache in memory only.
    pub cache_path: Option<PathBuf>,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("package identifier is not set (CN_PACKAGE)")]
    MissingPackage,
    #[error("secret key is not set (CN_SECRET_KEY)")]
    MissingSecretKey,
    #[error("directory endpoint is not set (CN_DIRECTORY_URL)")]
    MissingEndpoint,
    /// A numeric setting is zero or not a number.
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}

impl ConstellationConfig {
    /// Defaults for everything except identity.
    pub fn new(package_identifier: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            package_identifier: package_identifier.into(),
            secret_key: Zeroizing::new(secret_key.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CN_PACKAGE`: Package identifier
    /// - `CN_SECRET_KEY`: Secret key
    /// - `CN_DIRECTORY_URL`: Directory endpoint
    /// - `CN_CACHE_PATH`: Module cache file (default: in memory)
    /// - `CN_MAX_INBOUND`: Inbound history limit (default: 1000)
    /// - `CN_FETCH_TIMEOUT_SECS`: Directory request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConstellationConfig::from_env`], reading variables through
    /// `lookup`. Unset variables keep their defaults; nothing is validated
    /// beyond number parsing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(package) = lookup("CN_PACKAGE") {
            config.package_identifier = package;
        }
        if let Some(secret) = lookup("CN_SECRET_KEY") {
            config.secret_key = Zeroizing::new(secret);
        }
        if let Some(endpoint) = lookup("CN_DIRECTORY_URL") {
            config.directory.endpoint = endpoint;
        }
        if let Some(path) = lookup("CN_CACHE_PATH") {
            config.storage.cache_path = Some(PathBuf::from(path));
        }
        if let Some(limit) = lookup("CN_MAX_INBOUND") {
            config.bus.max_inbound_size = parse_number("CN_MAX_INBOUND", &limit)?;
        }
        if let Some(secs) = lookup("CN_FETCH_TIMEOUT_SECS") {
            config.directory.request_timeout =
                Duration::from_secs(parse_number("CN_FETCH_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.package_identifier.trim().is_empty() {
            return Err(ConfigError::MissingPackage);
        }
        if self.secret_key.is_empty() {
            return Err(ConfigError::MissingSecretKey);
        }
        if self.directory.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.bus.max_inbound_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_inbound_size must be greater than zero".into(),
            ));
        }
        if self.directory.request_timeout.is_zero() {
            return Err(ConfigError::InvalidLimit(
                "request_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidLimit(format!("{name}={raw} is not a number")))
}

impl fmt::Debug for ConstellationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstellationConfig")
            .field("package_identifier", &self.package_identifier)
            .field("secret_key", &"<redacted>")
            .field("bus", &self.bus)
            .field("directory", &self.directory)
            .field("storage", &self.storage)
            .finish()
    }
}
