//! Dashboard port
//!
//! The monitor publishes one [`MonitorEvent`] per poll cycle. The
//! presentation layer implements the port and decides how to show it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Departure, LeaveDecision, TransitStop, Urgency};
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// A departure decorated with its leave decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedDeparture {
    /// The departure as fetched
    pub departure: Departure,
    /// Countdown and urgency at the snapshot instant
    pub decision: LeaveDecision,
}

impl TrackedDeparture {
    /// Urgency bucket of this departure
    #[must_use]
    pub const fn urgency(&self) -> Urgency {
        self.decision.urgency
    }
}

/// Result of one successful poll cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureSnapshot {
    /// Stop the departures were fetched for
    pub stop: TransitStop,
    /// Destination the list was filtered on
    pub target_destination: String,
    /// Instant the decisions were computed against
    pub synced_at: DateTime<Utc>,
    /// Matching departures in source order
    pub departures: Vec<TrackedDeparture>,
}

impl DepartureSnapshot {
    /// The first departure in the list, which drives the headline countdown
    #[must_use]
    pub fn next(&self) -> Option<&TrackedDeparture> {
        self.departures.first()
    }

    /// True when no departure matched the target destination
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    /// Highest urgency among departures that have not left yet
    #[must_use]
    pub fn most_urgent(&self) -> Option<Urgency> {
        self.departures
            .iter()
            .map(TrackedDeparture::urgency)
            .filter(|u| *u != Urgency::Departed)
            .max()
    }
}

/// Outcome of a poll cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// The source answered; the list may be empty
    Snapshot(DepartureSnapshot),
    /// The source call failed or timed out
    SourceUnavailable {
        /// Error description
        message: String,
        /// Failures in a row, including this one
        consecutive_failures: u32,
        /// When the failure was observed
        occurred_at: DateTime<Utc>,
    },
}

impl MonitorEvent {
    /// Returns the snapshot if the cycle succeeded
    #[must_use]
    pub const fn snapshot(&self) -> Option<&DepartureSnapshot> {
        match self {
            Self::Snapshot(snapshot) => Some(snapshot),
            Self::SourceUnavailable { .. } => None,
        }
    }

    /// True for a failed cycle
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}

/// Port for delivering monitor events to a presentation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DashboardPort: Send + Sync {
    /// Hand an event to the presentation
    ///
    /// Returns [`ApplicationError::DashboardClosed`] once nobody is listening.
    async fn publish(&self, event: MonitorEvent) -> Result<(), ApplicationError>;
}
