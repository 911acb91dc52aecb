//! Transit API configuration

use integration_transit::TransitConfig;
use serde::{Deserialize, Serialize};

/// MVG API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitAppConfig {
    /// Base URL of the departure API
    #[serde(default = "default_transit_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_transit_timeout")]
    pub timeout_secs: u64,

    /// Skip departures sooner than this many minutes
    #[serde(default)]
    pub offset_minutes: u32,
}

fn default_transit_base_url() -> String {
    TransitConfig::default().base_url
}

const fn default_transit_timeout() -> u64 {
    10
}

impl Default for TransitAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_transit_base_url(),
            timeout_secs: default_transit_timeout(),
            offset_minutes: 0,
        }
    }
}

impl TransitAppConfig {
    /// Convert to `integration_transit::TransitConfig`
    #[must_use]
    pub fn to_transit_config(&self) -> TransitConfig {
        TransitConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout_secs: self.timeout_secs,
            offset_minutes: self.offset_minutes,
            ..TransitConfig::default()
        }
    }

    /// Validate the transit section
    ///
    /// # Errors
    ///
    /// Returns an error if the derived client configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.to_transit_config()
            .validate()
            .map_err(|e| format!("transit: {e}"))
    }
}
