//! Urgency value object
//!
//! Discrete classification of how soon the user has to start walking
//! to catch a departure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (inclusive, in minutes until leave) of the `Prep` bucket
pub const PREP_THRESHOLD_MINUTES: i64 = 2;

/// Upper bound (inclusive, in minutes until leave) of the `Wait` bucket
pub const WAIT_THRESHOLD_MINUTES: i64 = 5;

/// Urgency bucket of a departure relative to now
///
/// Ordered from most relaxed to most urgent; `Departed` sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// More than five minutes until the leave time
    Standby,
    /// Three to five minutes until the leave time
    Wait,
    /// Leave time is less than three minutes away
    Prep,
    /// Leave time has passed but the vehicle has not departed yet
    LeaveNow,
    /// The departure instant has passed
    Departed,
}

impl Urgency {
    /// Classify the raw (unclamped, floored) minutes until the leave time
    ///
    /// Only meaningful once `Departed` and `LeaveNow` have been ruled out,
    /// i.e. when the leave time is still in the future.
    #[must_use]
    pub const fn from_minutes_until_leave(minutes: i64) -> Self {
        if minutes <= PREP_THRESHOLD_MINUTES {
            Self::Prep
        } else if minutes <= WAIT_THRESHOLD_MINUTES {
            Self::Wait
        } else {
            Self::Standby
        }
    }

    /// Upper-case label as shown on the dashboard
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Standby => "STANDBY",
            Self::Wait => "WAIT",
            Self::Prep => "PREP",
            Self::LeaveNow => "LEAVE NOW",
            Self::Departed => "DEPARTED",
        }
    }

    /// Whether the user should be walking already
    #[must_use]
    pub const fn requires_action(&self) -> bool {
        matches!(self, Self::LeaveNow)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
