//! Terminal rendering of monitor events
//!
//! Everything here is pure string building; the caller decides where the
//! text goes and which time zone clock times are shown in.

use std::fmt::{Display, Write};

use application::ports::{DepartureSnapshot, MonitorEvent, TrackedDeparture};
use chrono::{DateTime, TimeZone, Utc};
use domain::{LeaveDecision, Urgency};

const RULE: &str = "────────────────────────────────────────────────────────";

/// Marker shown in front of a departure row
#[must_use]
pub const fn urgency_icon(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Standby => "🟢",
        Urgency::Wait => "🟡",
        Urgency::Prep => "🟠",
        Urgency::LeaveNow => "🔴",
        Urgency::Departed => "⚫",
    }
}

/// Status column of a departure row
#[must_use]
pub fn status_label(decision: &LeaveDecision) -> String {
    let minutes = decision.minutes_until_leave;
    match decision.urgency {
        Urgency::Departed => "DEPARTED".to_string(),
        Urgency::LeaveNow => "LEAVE NOW!".to_string(),
        Urgency::Prep => format!("PREP {minutes}MIN"),
        Urgency::Wait => format!("WAIT {minutes}MIN"),
        Urgency::Standby => format!("STANDBY {minutes}MIN"),
    }
}

/// Countdown under the headline
#[must_use]
pub fn countdown_line(decision: &LeaveDecision) -> String {
    if decision.departed {
        "DEPARTED".to_string()
    } else {
        format!("{} MIN REMAINING", decision.minutes_until_departure)
    }
}

/// What to do about the next departure
///
/// Outside the leave-now and prep windows the countdown is the time left
/// before the user has to set off, not the departure itself.
#[must_use]
pub fn leave_line(tracked: &TrackedDeparture) -> String {
    let decision = &tracked.decision;
    if decision.departed {
        "MISSED, WAIT FOR THE NEXT ONE".to_string()
    } else if decision.urgency.requires_action() {
        format!(
            "LEAVE NOW! LINE {} IN {} MIN",
            tracked.departure.line, decision.minutes_until_departure
        )
    } else if decision.urgency == Urgency::Prep {
        format!("PREPARE TO LEAVE IN {} MIN", decision.minutes_until_leave)
    } else {
        format!("DEPARTURE IN {} MINUTES", decision.minutes_until_leave)
    }
}

/// One line per departure: `icon LINE l | HH:MM | STATUS | ETA-nMIN`
#[must_use]
pub fn departure_row<Tz>(tracked: &TrackedDeparture, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let departure = &tracked.departure;
    let decision = &tracked.decision;

    let mut row = format!(
        "{} LINE {} | {} | {} | ETA-{}MIN",
        urgency_icon(decision.urgency),
        departure.line,
        departure.departure_time.with_timezone(tz).format("%H:%M"),
        status_label(decision),
        decision.minutes_until_departure,
    );

    if departure.cancelled {
        row.push_str(" | CANCELLED");
    } else if departure.is_delayed() {
        let delay = departure.delay_minutes.unwrap_or_default();
        let _ = write!(row, " | +{delay} LATE");
    }
    row
}

/// Footer with the sync time
#[must_use]
pub fn sync_line<Tz>(synced_at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("LAST SYNC: {}", synced_at.with_timezone(tz).format("%H:%M:%S"))
}

/// Body of a successful snapshot
#[must_use]
pub fn render_snapshot<Tz>(snapshot: &DepartureSnapshot, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();

    let Some(next) = snapshot.next() else {
        let _ = writeln!(
            out,
            "NO UPCOMING DEPARTURES TO {}",
            snapshot.target_destination
        );
        return out;
    };

    let _ = writeln!(
        out,
        "LINE {} → {}",
        next.departure.line, next.departure.destination
    );
    let _ = writeln!(out, "{}", countdown_line(&next.decision));
    let _ = writeln!(out, "{}", leave_line(next));
    let _ = writeln!(out, "{RULE}");
    for tracked in &snapshot.departures {
        let _ = writeln!(out, "{}", departure_row(tracked, tz));
    }
    out
}

/// State of the terminal dashboard between events
///
/// Keeps the last good snapshot so a failing source shows stale data with an
/// error marker instead of an empty screen.
#[derive(Debug, Default)]
pub struct DashboardView {
    last_snapshot: Option<DepartureSnapshot>,
    last_error: Option<(String, u32)>,
}

impl DashboardView {
    /// Create an empty view
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an event into the view
    pub fn apply(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Snapshot(snapshot) => {
                self.last_snapshot = Some(snapshot);
                self.last_error = None;
            },
            MonitorEvent::SourceUnavailable {
                message,
                consecutive_failures,
                ..
            } => {
                self.last_error = Some((message, consecutive_failures));
            },
        }
    }

    /// True while the latest cycle failed
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }

    /// Render the full frame
    #[must_use]
    pub fn render<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut out = String::new();

        if let Some(snapshot) = &self.last_snapshot {
            let status = snapshot
                .most_urgent()
                .map_or_else(String::new, |u| format!(" [{} {u}]", urgency_icon(u)));
            let _ = writeln!(
                out,
                "BUS TRACKER · {} → {}{status}",
                snapshot.stop, snapshot.target_destination
            );
        } else {
            let _ = writeln!(out, "BUS TRACKER");
        }
        let _ = writeln!(out, "{RULE}");

        if let Some((message, failures)) = &self.last_error {
            let _ = writeln!(out, "DATA FETCH ERROR: {message} ({failures} IN A ROW)");
        }

        match &self.last_snapshot {
            Some(snapshot) => {
                out.push_str(&render_snapshot(snapshot, tz));
                let _ = writeln!(out, "{RULE}");
                let sync = sync_line(snapshot.synced_at, tz);
                if self.is_stale() {
                    let _ = writeln!(out, "{sync} (STALE)");
                } else {
                    let _ = writeln!(out, "{sync}");
                }
            },
            None if self.last_error.is_none() => {
                let _ = writeln!(out, "WAITING FOR FIRST SYNC...");
            },
            None => {},
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use domain::{Departure, LeavePolicy, TransitStop};

    use super::*;

    const TARGET: &str = "Garching, Forschungszentrum (U)";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    fn tracked_departure(departure: Departure) -> TrackedDeparture {
        let decision = LeavePolicy::from_minutes(5)
            .unwrap()
            .decide(departure.departure_time, now());
        TrackedDeparture {
            departure,
            decision,
        }
    }

    fn tracked(line: &str, seconds: i64) -> TrackedDeparture {
        tracked_departure(Departure::new(line, TARGET, now() + Duration::seconds(seconds)))
    }

    fn snapshot(departures: Vec<TrackedDeparture>) -> DepartureSnapshot {
        DepartureSnapshot {
            stop: TransitStop::new("de:09184:2510", "Parkring Süd").with_place("Garching"),
            target_destination: TARGET.to_string(),
            synced_at: now(),
            departures,
        }
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(&tracked("230", 20 * 60).decision), "STANDBY 15MIN");
        assert_eq!(status_label(&tracked("230", 9 * 60).decision), "WAIT 4MIN");
        assert_eq!(status_label(&tracked("230", 7 * 60).decision), "PREP 2MIN");
        assert_eq!(status_label(&tracked("230", 3 * 60).decision), "LEAVE NOW!");
        assert_eq!(status_label(&tracked("230", -60).decision), "DEPARTED");
    }

    #[test]
    fn test_countdown_line() {
        assert_eq!(countdown_line(&tracked("230", 12 * 60).decision), "12 MIN REMAINING");
        assert_eq!(countdown_line(&tracked("230", 0).decision), "DEPARTED");
    }

    #[test]
    fn test_leave_line() {
        assert_eq!(leave_line(&tracked("230", 3 * 60)), "LEAVE NOW! LINE 230 IN 3 MIN");
        assert_eq!(leave_line(&tracked("230", 6 * 60)), "PREPARE TO LEAVE IN 1 MIN");
        assert_eq!(leave_line(&tracked("230", 12 * 60)), "DEPARTURE IN 7 MINUTES");
        assert_eq!(leave_line(&tracked("230", -60)), "MISSED, WAIT FOR THE NEXT ONE");
    }

    #[test]
    fn test_departure_row() {
        let row = departure_row(&tracked("230", 12 * 60), &Utc);
        assert_eq!(row, "🟢 LINE 230 | 08:12 | STANDBY 7MIN | ETA-12MIN");
    }

    #[test]
    fn test_departure_row_marks_delay_and_cancellation() {
        let delayed = tracked_departure(
            Departure::new("230", TARGET, now() + Duration::minutes(12)).with_delay_minutes(3),
        );
        assert!(departure_row(&delayed, &Utc).ends_with("| +3 LATE"));

        let cancelled = tracked_departure(
            Departure::new("230", TARGET, now() + Duration::minutes(12)).cancelled(),
        );
        assert!(departure_row(&cancelled, &Utc).ends_with("| CANCELLED"));

        let early = tracked_departure(
            Departure::new("230", TARGET, now() + Duration::minutes(12)).with_delay_minutes(-1),
        );
        assert!(departure_row(&early, &Utc).ends_with("ETA-12MIN"));
    }

    #[test]
    fn test_row_uses_given_time_zone() {
        let cet = chrono::FixedOffset::east_opt(3600).unwrap();
        let row = departure_row(&tracked("230", 12 * 60), &cet);
        assert!(row.contains("09:12"));
    }

    #[test]
    fn test_sync_line() {
        assert_eq!(sync_line(now(), &Utc), "LAST SYNC: 08:00:00");
    }

    #[test]
    fn test_render_empty_snapshot() {
        let text = render_snapshot(&snapshot(Vec::new()), &Utc);
        assert_eq!(text.trim(), format!("NO UPCOMING DEPARTURES TO {TARGET}"));
    }

    #[test]
    fn test_render_snapshot_headline_and_rows() {
        let text = render_snapshot(
            &snapshot(vec![tracked("230", 6 * 60), tracked("230", 20 * 60)]),
            &Utc,
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("LINE 230 → {TARGET}"));
        assert_eq!(lines[1], "6 MIN REMAINING");
        assert_eq!(lines[2], "PREPARE TO LEAVE IN 1 MIN");
        assert!(lines[4].contains("PREP 1MIN"));
        assert!(lines[5].contains("STANDBY 15MIN"));
    }

    #[test]
    fn test_header_shows_most_urgent_pending_departure() {
        let mut view = DashboardView::new();
        view.apply(MonitorEvent::Snapshot(snapshot(vec![
            tracked("229", -60),
            tracked("230", 20 * 60),
            tracked("230", 3 * 60),
        ])));
        let header = view.render(&Utc).lines().next().unwrap().to_string();
        assert!(header.ends_with("[🔴 LEAVE NOW]"));

        let mut view = DashboardView::new();
        view.apply(MonitorEvent::Snapshot(snapshot(vec![tracked("229", -60)])));
        let header = view.render(&Utc).lines().next().unwrap().to_string();
        assert!(header.ends_with(TARGET));
    }

    #[test]
    fn test_view_waits_for_first_sync() {
        let view = DashboardView::new();
        assert!(view.render(&Utc).contains("WAITING FOR FIRST SYNC"));
    }

    #[test]
    fn test_view_keeps_stale_snapshot_on_error() {
        let mut view = DashboardView::new();
        view.apply(MonitorEvent::Snapshot(snapshot(vec![tracked("230", 12 * 60)])));
        view.apply(MonitorEvent::SourceUnavailable {
            message: "timeout".to_string(),
            consecutive_failures: 2,
            occurred_at: now(),
        });

        let text = view.render(&Utc);
        assert!(view.is_stale());
        assert!(text.contains("DATA FETCH ERROR: timeout (2 IN A ROW)"));
        assert!(text.contains("LINE 230 |"));
        assert!(text.contains("LAST SYNC: 08:00:00 (STALE)"));
        assert!(text.contains("Parkring Süd, Garching"));
    }

    #[test]
    fn test_view_recovers_after_error() {
        let mut view = DashboardView::new();
        view.apply(MonitorEvent::SourceUnavailable {
            message: "timeout".to_string(),
            consecutive_failures: 1,
            occurred_at: now(),
        });
        view.apply(MonitorEvent::Snapshot(snapshot(Vec::new())));

        let text = view.render(&Utc);
        assert!(!view.is_stale());
        assert!(!text.contains("DATA FETCH ERROR"));
        assert!(text.contains("NO UPCOMING DEPARTURES"));
    }
}
