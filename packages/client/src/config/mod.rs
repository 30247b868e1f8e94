//! Cache engine configuration
//!
//! `CacheConfig` is deserializable from JSON so deployments can ship the
//! generation label and seed list next to the built assets.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

pub mod validation;

pub use validation::{ConfigDefaults, ConfigResult, ConfigValidator, ConfigurationError, Validator};

use crate::lifecycle::SeedList;

/// Configuration for one deployment of the interception layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Current cache generation label; every other generation is swept on activation
    pub generation: String,
    /// Origin that seed paths and the offline fallback are resolved against
    pub origin: Url,
    /// Resources fetched and stored at install time
    pub seed: SeedList,
    /// Treat keys differing only by query string as equal on lookup
    pub ignore_query: bool,
    /// Use navigation preload responses once activated
    pub navigation_preload: bool,
    /// Stored document served to navigations when the network and the store both miss
    pub offline_fallback: Option<String>,
    /// Transport timeout in seconds
    pub network_timeout_secs: u64,
    /// Directory for persisted stores; in-memory only when unset
    pub storage_dir: Option<PathBuf>,
    /// Revision manifest produced by the asset pipeline
    pub manifest: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            generation: ConfigDefaults::DEFAULT_GENERATION.to_string(),
            origin: default_origin(),
            seed: SeedList::default(),
            ignore_query: true,
            navigation_preload: true,
            offline_fallback: None,
            network_timeout_secs: ConfigDefaults::DEFAULT_NETWORK_TIMEOUT.as_secs(),
            storage_dir: None,
            manifest: None,
        }
    }
}

fn default_origin() -> Url {
    // Compile-time constant known to parse
    Url::parse(ConfigDefaults::DEFAULT_ORIGIN).unwrap_or_else(|_| unreachable!())
}

impl CacheConfig {
    /// Parse and validate a JSON configuration document
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Parse` for malformed JSON and any
    /// validation error for out-of-range values.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Io` if the file cannot be read, otherwise
    /// as [`CacheConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    #[must_use]
    pub fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.network_timeout_secs)
    }
}

impl Validator for CacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_generation(&self.generation)?;
        ConfigValidator::validate_origin(&self.origin)?;
        ConfigValidator::validate_timeout(self.network_timeout(), "network_timeout")?;
        for path in self.seed.paths() {
            ConfigValidator::validate_path(path, "seed path")?;
        }
        if let Some(fallback) = &self.offline_fallback {
            ConfigValidator::validate_path(fallback, "offline fallback")?;
        }
        Ok(())
    }
}
