//! Departure filter

use crate::entities::Departure;

/// Keep departures whose destination equals `target` exactly
///
/// Matching is case-sensitive and does not trim whitespace. Source order is
/// preserved; an empty result is a valid outcome.
#[must_use]
pub fn filter_by_destination(departures: &[Departure], target: &str) -> Vec<Departure> {
    departures
        .iter()
        .filter(|dep| dep.destination == target)
        .cloned()
        .collect()
}
