//! Leave-time decision engine
//!
//! Turns a departure instant into countdown values and an [`Urgency`]
//! bucket, given how long it takes to walk to the stop.
//!
//! Threshold comparisons always use the signed, unclamped delta between the
//! leave time and now. The clamped minute values exist for display only, so a
//! departure sitting exactly on the walk-duration boundary is classified the
//! same way no matter how the display rounds.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::Urgency;

/// Longest walk the engine accepts, in minutes
pub const MAX_WALK_MINUTES: i64 = 180;

/// Result of evaluating one departure against the current instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDecision {
    /// Instant by which the user has to start walking
    pub leave_time: DateTime<Utc>,
    /// Whole minutes until departure, clamped at zero
    pub minutes_until_departure: u32,
    /// Whole minutes until the leave time, clamped at zero
    pub minutes_until_leave: u32,
    /// Whether the departure instant is at or before now
    pub departed: bool,
    /// Urgency bucket
    pub urgency: Urgency,
}

/// Evaluate a departure
///
/// Pure and deterministic in its three inputs.
#[must_use]
pub fn decide(departure_time: DateTime<Utc>, now: DateTime<Utc>, walk: Duration) -> LeaveDecision {
    let leave_time = departure_time - walk;
    let until_departure = departure_time - now;
    let until_leave = leave_time - now;

    let departed = departure_time <= now;
    let urgency = if departed {
        Urgency::Departed
    } else if leave_time <= now {
        Urgency::LeaveNow
    } else {
        Urgency::from_minutes_until_leave(floor_minutes(until_leave))
    };

    LeaveDecision {
        leave_time,
        minutes_until_departure: clamp_minutes(floor_minutes(until_departure)),
        minutes_until_leave: clamp_minutes(floor_minutes(until_leave)),
        departed,
        urgency,
    }
}

/// Whole minutes in a signed delta, rounded towards negative infinity
fn floor_minutes(delta: Duration) -> i64 {
    delta.num_seconds().div_euclid(60)
}

fn clamp_minutes(minutes: i64) -> u32 {
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}

/// Validated walk duration bound to the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeavePolicy {
    walk: Duration,
}

impl LeavePolicy {
    /// Create a policy for a walk of `walk_minutes`
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidWalkDuration`] for negative walks or
    /// walks longer than [`MAX_WALK_MINUTES`].
    pub fn from_minutes(walk_minutes: i64) -> Result<Self, DomainError> {
        if !(0..=MAX_WALK_MINUTES).contains(&walk_minutes) {
            return Err(DomainError::InvalidWalkDuration(format!(
                "{walk_minutes} minutes (allowed: 0-{MAX_WALK_MINUTES})"
            )));
        }
        Ok(Self {
            walk: Duration::minutes(walk_minutes),
        })
    }

    /// The configured walk duration
    #[must_use]
    pub const fn walk(&self) -> Duration {
        self.walk
    }

    /// Evaluate a departure with this policy's walk duration
    #[must_use]
    pub fn decide(&self, departure_time: DateTime<Utc>, now: DateTime<Utc>) -> LeaveDecision {
        decide(departure_time, now, self.walk)
    }
}
