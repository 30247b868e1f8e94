//! Configuration validation
//!
//! Rules shared by every configuration entry point, whether the values come
//! from a JSON file or from the fluent builder.

use std::time::Duration;

use url::Url;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid cache generation: {0}")]
    InvalidGeneration(String),

    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),

    #[error("Invalid resource path: {0}")]
    InvalidPath(String),

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("Unable to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unable to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` encountered.
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate timeout duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTimeout` if the duration is zero or
    /// exceeds 1 hour.
    pub fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot be zero"
            )));
        }

        if timeout.as_secs() > 3600 {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot exceed 1 hour"
            )));
        }

        Ok(())
    }

    /// Validate a generation label
    ///
    /// Labels double as directory names for persisted stores, so they must be
    /// non-empty and free of path separators.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidGeneration` on a bad label.
    pub fn validate_generation(generation: &str) -> ConfigResult<()> {
        if generation.trim().is_empty() {
            return Err(ConfigurationError::InvalidGeneration(
                "generation label cannot be empty".to_string(),
            ));
        }

        if generation.contains(['/', '\\']) || generation == "." || generation == ".." {
            return Err(ConfigurationError::InvalidGeneration(format!(
                "`{generation}` cannot be used as a store name"
            )));
        }

        Ok(())
    }

    /// Validate the origin every seed path is resolved against
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidOrigin` unless the URL is http(s)
    /// with a host.
    pub fn validate_origin(origin: &Url) -> ConfigResult<()> {
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ConfigurationError::InvalidOrigin(format!(
                "unsupported scheme `{}`",
                origin.scheme()
            )));
        }

        if origin.host_str().is_none() {
            return Err(ConfigurationError::InvalidOrigin(format!(
                "`{origin}` has no host"
            )));
        }

        Ok(())
    }

    /// Validate an origin-relative resource path
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidPath` unless the path is absolute.
    pub fn validate_path(path: &str, name: &str) -> ConfigResult<()> {
        if !path.starts_with('/') {
            return Err(ConfigurationError::InvalidPath(format!(
                "{name} `{path}` must start with `/`"
            )));
        }

        Ok(())
    }
}

/// Common configuration defaults
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const DEFAULT_GENERATION: &'static str = "v1";
    pub const DEFAULT_ORIGIN: &'static str = "http://localhost:8000/";
    pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(30);
}
