//! Application configuration
//!
//! Split into focused sub-modules:
//! - `tracker`: stop, destination, walk time and poll timing
//! - `integrations`: MVG API client settings
//! - `logging`: log filter and format
//!
//! Sources are layered: built-in defaults, then an optional TOML file, then
//! `BUSTRACKER_*` environment variables (`__` separates nested keys, e.g.
//! `BUSTRACKER_TRACKER__WALK_MINUTES=7`).

mod integrations;
mod logging;
mod tracker;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;

pub use integrations::TransitAppConfig;
pub use logging::LoggingConfig;
pub use tracker::TrackerConfig;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "BUSTRACKER";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Departure monitor settings
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// MVG API settings
    #[serde(default)]
    pub transit: TransitAppConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Backoff for the startup stop lookup
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Without `path`, `config.toml` in the working directory is used if it
    /// exists. An explicit `path` must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong
    /// type.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("tracker.transport_modes")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        self.tracker.validate()?;
        self.transit.validate()?;
        self.retry.validate()?;
        if self.logging.log_filter.trim().is_empty() {
            return Err("logging.log_filter must not be empty".to_string());
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
