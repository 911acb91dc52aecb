//! Tracker configuration: which stop, which destination, how often.

use std::time::Duration;

use application::{MonitorConfig, StopSelector};
use domain::{DomainError, LeavePolicy, MAX_WALK_MINUTES, TransitStop, TransportMode};
use serde::{Deserialize, Serialize};

/// Settings for the departure monitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Stop name to look up at startup
    #[serde(default = "default_stop_name")]
    pub stop_name: String,

    /// Known stop id; skips the name lookup when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<String>,

    /// Destination to track, matched exactly
    #[serde(default = "default_target_destination")]
    pub target_destination: String,

    /// Walk from the door to the stop, in minutes
    #[serde(default = "default_walk_minutes")]
    pub walk_minutes: u32,

    /// Seconds between polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Departures requested per poll
    #[serde(default = "default_departure_limit")]
    pub departure_limit: u8,

    /// Vehicle types requested from the source
    #[serde(default = "default_transport_modes")]
    pub transport_modes: Vec<TransportMode>,

    /// Seconds between polls once the source keeps failing
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,

    /// Failures in a row before switching to the error backoff
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
}

fn default_stop_name() -> String {
    "Parkring Süd".to_string()
}

fn default_target_destination() -> String {
    "Garching, Forschungszentrum (U)".to_string()
}

const fn default_walk_minutes() -> u32 {
    5
}

const fn default_poll_interval_secs() -> u64 {
    10
}

const fn default_departure_limit() -> u8 {
    10
}

fn default_transport_modes() -> Vec<TransportMode> {
    vec![TransportMode::RegionalBus]
}

const fn default_error_backoff_secs() -> u64 {
    30
}

const fn default_failure_threshold() -> u32 {
    3
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            stop_name: default_stop_name(),
            stop_id: None,
            target_destination: default_target_destination(),
            walk_minutes: default_walk_minutes(),
            poll_interval_secs: default_poll_interval_secs(),
            departure_limit: default_departure_limit(),
            transport_modes: default_transport_modes(),
            error_backoff_secs: default_error_backoff_secs(),
            failure_threshold: default_failure_threshold(),
        }
    }
}

impl TrackerConfig {
    /// Validate the tracker section
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.stop_name.trim().is_empty() && self.stop_id.is_none() {
            return Err("tracker.stop_name must not be empty".to_string());
        }
        if self
            .stop_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err("tracker.stop_id must not be empty when set".to_string());
        }
        if self.target_destination.is_empty() {
            return Err("tracker.target_destination must not be empty".to_string());
        }
        if i64::from(self.walk_minutes) > MAX_WALK_MINUTES {
            return Err(format!(
                "tracker.walk_minutes must be {MAX_WALK_MINUTES} or less"
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err("tracker.poll_interval_secs must be greater than 0".to_string());
        }
        if self.departure_limit == 0 || self.departure_limit > integration_transit::MAX_DEPARTURE_LIMIT {
            return Err(format!(
                "tracker.departure_limit must be between 1 and {}",
                integration_transit::MAX_DEPARTURE_LIMIT
            ));
        }
        if self.transport_modes.is_empty() {
            return Err("tracker.transport_modes must list at least one mode".to_string());
        }
        if self.error_backoff_secs == 0 {
            return Err("tracker.error_backoff_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// The configured walk as a decision policy
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidWalkDuration`] if the walk is too long.
    pub fn leave_policy(&self) -> Result<LeavePolicy, DomainError> {
        LeavePolicy::from_minutes(i64::from(self.walk_minutes))
    }

    /// How the stop should be resolved
    #[must_use]
    pub fn stop_selector(&self) -> StopSelector {
        match &self.stop_id {
            Some(id) => StopSelector::Id {
                id: id.trim().to_string(),
                name: self.stop_name.clone(),
            },
            None => StopSelector::Name(self.stop_name.clone()),
        }
    }

    /// Build the monitor configuration for a resolved stop
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidWalkDuration`] if the walk is too long.
    pub fn monitor_config(&self, stop: TransitStop) -> Result<MonitorConfig, DomainError> {
        Ok(
            MonitorConfig::new(stop, self.target_destination.clone(), self.leave_policy()?)
                .with_poll_interval(Duration::from_secs(self.poll_interval_secs))
                .with_departure_limit(self.departure_limit)
                .with_transport_modes(self.transport_modes.clone())
                .with_error_backoff(
                    Duration::from_secs(self.error_backoff_secs),
                    self.failure_threshold,
                ),
        )
    }
}
