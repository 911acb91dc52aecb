//! Property-based tests for the decision engine and destination filter
//!
//! These tests use proptest to verify invariants across many random inputs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use domain::{Departure, Urgency, decide, filter_by_destination};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

// ============================================================================
// Decision Engine Property Tests
// ============================================================================

mod decision_tests {
    use super::*;

    proptest! {
        #[test]
        fn standby_beyond_walk_plus_five_minutes(
            walk_min in 0i64..=60,
            extra_secs in (6 * 60i64)..(6 * 3600)
        ) {
            // at least walk + 6 min; walk + 5m59s still floors into WAIT
            let walk = Duration::minutes(walk_min);
            let dep = now() + walk + Duration::seconds(extra_secs);
            let d = decide(dep, now(), walk);
            prop_assert_eq!(d.urgency, Urgency::Standby);
        }

        #[test]
        fn prep_within_two_minutes_of_leave_time(
            walk_min in 0i64..=60,
            leave_secs in 1i64..=120
        ) {
            let walk = Duration::minutes(walk_min);
            let dep = now() + walk + Duration::seconds(leave_secs);
            let d = decide(dep, now(), walk);
            prop_assert_eq!(d.urgency, Urgency::Prep);
        }

        #[test]
        fn past_departures_are_departed(
            walk_min in 0i64..=60,
            ago_secs in 0i64..=86_400
        ) {
            let dep = now() - Duration::seconds(ago_secs);
            let d = decide(dep, now(), Duration::minutes(walk_min));
            prop_assert!(d.departed);
            prop_assert_eq!(d.urgency, Urgency::Departed);
            prop_assert_eq!(d.minutes_until_departure, 0);
        }

        #[test]
        fn leave_now_between_leave_time_and_departure(
            walk_min in 1i64..=60,
            frac in 0.0f64..1.0
        ) {
            let walk = Duration::minutes(walk_min);
            // any instant in (departure - walk, departure]
            #[allow(clippy::cast_possible_truncation)]
            let into_walk = ((walk.num_seconds() as f64) * frac) as i64;
            let dep = now() + walk - Duration::seconds(into_walk);
            let d = decide(dep, now(), walk);
            if dep > now() {
                prop_assert_eq!(d.urgency, Urgency::LeaveNow);
                prop_assert!(!d.departed);
            }
        }

        #[test]
        fn minute_values_never_overflow_or_go_negative(
            offset_secs in -1_000_000i64..1_000_000,
            walk_min in 0i64..=180
        ) {
            let dep = now() + Duration::seconds(offset_secs);
            let d = decide(dep, now(), Duration::minutes(walk_min));
            // u32 cannot be negative; check the clamp kicks in for the past
            if offset_secs <= 0 {
                prop_assert_eq!(d.minutes_until_departure, 0);
                prop_assert_eq!(d.minutes_until_leave, 0);
            }
            prop_assert!(d.minutes_until_leave <= d.minutes_until_departure);
        }

        #[test]
        fn urgency_never_decreases_as_time_passes(
            offset_secs in -600i64..7_200,
            step_secs in 0i64..600,
            walk_min in 0i64..=30
        ) {
            let walk = Duration::minutes(walk_min);
            let dep = now() + Duration::seconds(offset_secs);
            let earlier = decide(dep, now(), walk);
            let later = decide(dep, now() + Duration::seconds(step_secs), walk);
            prop_assert!(later.urgency >= earlier.urgency);
        }
    }
}

// ============================================================================
// Destination Filter Property Tests
// ============================================================================

mod filter_tests {
    use super::*;

    fn destination() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Garching, Forschungszentrum (U)".to_string()),
            Just("Garching-Hochbrück".to_string()),
            Just("garching, forschungszentrum (u)".to_string()),
            "[A-Za-z ]{0,12}",
        ]
    }

    fn departures() -> impl Strategy<Value = Vec<Departure>> {
        prop::collection::vec((destination(), 0i64..3_600), 0..20).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (dest, secs))| {
                    Departure::new(format!("L{i}"), dest, now() + Duration::seconds(secs))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn filter_is_idempotent(deps in departures(), target in destination()) {
            let once = filter_by_destination(&deps, &target);
            let twice = filter_by_destination(&once, &target);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn filter_preserves_order(deps in departures(), target in destination()) {
            let filtered = filter_by_destination(&deps, &target);
            let expected: Vec<Departure> = deps
                .iter()
                .filter(|d| d.destination == target)
                .cloned()
                .collect();
            prop_assert_eq!(filtered, expected);
        }

        #[test]
        fn filter_only_returns_exact_matches(deps in departures(), target in destination()) {
            let filtered = filter_by_destination(&deps, &target);
            prop_assert!(filtered.iter().all(|d| d.destination == target));
            prop_assert!(filtered.len() <= deps.len());
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_standby() {
    let d = decide(now() + Duration::minutes(12), now(), Duration::minutes(5));
    assert_eq!(d.urgency, Urgency::Standby);
    assert_eq!(d.minutes_until_departure, 12);
}

#[test]
fn scenario_b_prep() {
    let d = decide(now() + Duration::minutes(6), now(), Duration::minutes(5));
    assert_eq!(d.urgency, Urgency::Prep);
}

#[test]
fn scenario_c_leave_now() {
    let d = decide(now() + Duration::minutes(4), now(), Duration::minutes(5));
    assert_eq!(d.urgency, Urgency::LeaveNow);
    assert_eq!(d.minutes_until_departure, 4);
}

#[test]
fn scenario_d_departed() {
    let d = decide(now() - Duration::minutes(1), now(), Duration::minutes(5));
    assert_eq!(d.urgency, Urgency::Departed);
    assert_eq!(d.minutes_until_departure, 0);
}

#[test]
fn scenario_e_empty_source() {
    assert!(filter_by_destination(&[], "Garching, Forschungszentrum (U)").is_empty());
}
