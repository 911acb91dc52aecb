//! Departure entity - One scheduled vehicle leaving the tracked stop

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::TransportMode;

/// A single upcoming departure at the tracked stop
///
/// Departures are fetched fresh on every poll and carry no identity across
/// polls; two departures are only related by their timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    /// Line identifier (e.g. "230", "U6")
    pub line: String,
    /// Destination as announced by the operator
    pub destination: String,
    /// Best known departure instant (realtime estimate if available)
    pub departure_time: DateTime<Utc>,
    /// Timetabled departure instant
    pub planned_time: DateTime<Utc>,
    /// Vehicle type
    pub transport_mode: TransportMode,
    /// Delay in minutes reported by the operator (None = no realtime data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_minutes: Option<i64>,
    /// Whether the trip was cancelled
    #[serde(default)]
    pub cancelled: bool,
    /// Platform or stop position, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl Departure {
    /// Create a bus departure running on time
    #[must_use]
    pub fn new(
        line: impl Into<String>,
        destination: impl Into<String>,
        departure_time: DateTime<Utc>,
    ) -> Self {
        Self {
            line: line.into(),
            destination: destination.into(),
            departure_time,
            planned_time: departure_time,
            transport_mode: TransportMode::Bus,
            delay_minutes: None,
            cancelled: false,
            platform: None,
        }
    }

    /// Set the timetabled instant
    #[must_use]
    pub const fn with_planned_time(mut self, planned_time: DateTime<Utc>) -> Self {
        self.planned_time = planned_time;
        self
    }

    /// Set the transport mode
    #[must_use]
    pub const fn with_transport_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = mode;
        self
    }

    /// Set the reported delay
    #[must_use]
    pub const fn with_delay_minutes(mut self, delay: i64) -> Self {
        self.delay_minutes = Some(delay);
        self
    }

    /// Mark as cancelled
    #[must_use]
    pub const fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }

    /// Set the platform
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Whether the operator reports a positive delay
    #[must_use]
    pub fn is_delayed(&self) -> bool {
        self.delay_minutes.is_some_and(|d| d > 0)
    }
}
