//! Departure monitor
//!
//! Drives the poll cycle: fetch departures for the tracked stop, keep the
//! ones heading to the target destination, attach a leave decision to each
//! and publish the result. A failing source is reported as an event and
//! never ends the loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use domain::{Departure, LeavePolicy, TransitStop, TransportMode, filter_by_destination};
use tokio::sync::Notify;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{
    DashboardPort, DepartureQuery, DepartureSnapshot, DepartureSourcePort, MonitorEvent,
    TrackedDeparture,
};

/// Configuration for the departure monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Stop to poll
    pub stop: TransitStop,
    /// Exact destination string to keep
    pub target_destination: String,
    /// Walk time to the stop
    pub policy: LeavePolicy,
    /// Delay between polls
    pub poll_interval: Duration,
    /// Departures requested per poll
    pub departure_limit: u8,
    /// Vehicle types requested (empty = all)
    pub transport_modes: Vec<TransportMode>,
    /// Delay between polls once the source keeps failing
    pub error_backoff: Duration,
    /// Failures in a row before switching to `error_backoff` (0 = never)
    pub failure_threshold: u32,
}

impl MonitorConfig {
    /// Create a configuration with default timing
    #[must_use]
    pub fn new(stop: TransitStop, target_destination: impl Into<String>, policy: LeavePolicy) -> Self {
        Self {
            stop,
            target_destination: target_destination.into(),
            policy,
            poll_interval: Duration::from_secs(10),
            departure_limit: 10,
            transport_modes: Vec::new(),
            error_backoff: Duration::from_secs(30),
            failure_threshold: 3,
        }
    }

    /// Set the delay between polls
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the number of departures requested per poll
    #[must_use]
    pub const fn with_departure_limit(mut self, limit: u8) -> Self {
        self.departure_limit = limit;
        self
    }

    /// Restrict the poll to the given vehicle types
    #[must_use]
    pub fn with_transport_modes(mut self, modes: Vec<TransportMode>) -> Self {
        self.transport_modes = modes;
        self
    }

    /// Set the backoff used after `threshold` failures in a row
    #[must_use]
    pub const fn with_error_backoff(mut self, backoff: Duration, threshold: u32) -> Self {
        self.error_backoff = backoff;
        self.failure_threshold = threshold;
        self
    }
}

/// Filter `departures` on `target` and decide each one against `now`
#[must_use]
pub fn track_departures(
    departures: &[Departure],
    target: &str,
    policy: &LeavePolicy,
    now: DateTime<Utc>,
) -> Vec<TrackedDeparture> {
    filter_by_destination(departures, target)
        .into_iter()
        .map(|departure| {
            let decision = policy.decide(departure.departure_time, now);
            TrackedDeparture {
                departure,
                decision,
            }
        })
        .collect()
}

/// Wakes a running monitor for an immediate poll
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    notify: Arc<Notify>,
}

impl RefreshHandle {
    /// Request a poll now
    ///
    /// Requests made while a poll is in flight collapse into one.
    pub fn trigger(&self) {
        self.notify.notify_one();
    }
}

/// Polls the departure source and turns each cycle into a [`MonitorEvent`]
///
/// Single polls only need a source; [`Self::run`] takes the dashboard that
/// receives the events of the loop.
pub struct DepartureMonitor {
    source: Arc<dyn DepartureSourcePort>,
    config: MonitorConfig,
    refresh: Arc<Notify>,
    consecutive_failures: u32,
}

impl std::fmt::Debug for DepartureMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepartureMonitor")
            .field("config", &self.config)
            .field("consecutive_failures", &self.consecutive_failures)
            .finish_non_exhaustive()
    }
}

impl DepartureMonitor {
    /// Create a new monitor
    #[must_use]
    pub fn new(source: Arc<dyn DepartureSourcePort>, config: MonitorConfig) -> Self {
        Self {
            source,
            config,
            refresh: Arc::new(Notify::new()),
            consecutive_failures: 0,
        }
    }

    /// The monitor configuration
    #[must_use]
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Failures in a row since the last successful poll
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Handle for triggering a manual refresh
    #[must_use]
    pub fn refresh_handle(&self) -> RefreshHandle {
        RefreshHandle {
            notify: Arc::clone(&self.refresh),
        }
    }

    /// Run one poll cycle, deciding against the instant the fetch returned
    pub async fn poll_once(&mut self) -> MonitorEvent {
        let result = self.fetch().await;
        self.record(result, Utc::now())
    }

    /// Run one poll cycle, deciding against `now`
    pub async fn poll_once_at(&mut self, now: DateTime<Utc>) -> MonitorEvent {
        let result = self.fetch().await;
        self.record(result, now)
    }

    /// Delay before the next poll
    #[must_use]
    pub const fn next_delay(&self) -> Duration {
        if self.config.failure_threshold > 0
            && self.consecutive_failures >= self.config.failure_threshold
        {
            self.config.error_backoff
        } else {
            self.config.poll_interval
        }
    }

    /// Poll until `shutdown` resolves
    ///
    /// Each cycle publishes exactly one event to `dashboard`. Between cycles
    /// the monitor sleeps for [`Self::next_delay`] or until a refresh is triggered.
    ///
    /// # Errors
    ///
    /// Returns the dashboard's error when an event cannot be delivered.
    pub async fn run<F>(
        mut self,
        dashboard: &dyn DashboardPort,
        shutdown: F,
    ) -> Result<(), ApplicationError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            stop = %self.config.stop,
            target = %self.config.target_destination,
            interval_secs = self.config.poll_interval.as_secs(),
            "Departure monitor started"
        );

        loop {
            let event = tokio::select! {
                biased;
                () = &mut shutdown => break,
                event = self.poll_once() => event,
            };

            if let Err(e) = dashboard.publish(event).await {
                warn!(error = %e, "Dashboard stopped accepting events");
                return Err(e);
            }

            let delay = self.next_delay();
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = tokio::time::sleep(delay) => {},
                () = self.refresh.notified() => debug!("Manual refresh requested"),
            }
        }

        info!("Departure monitor stopped");
        Ok(())
    }

    #[instrument(skip(self), fields(stop_id = %self.config.stop.id))]
    async fn fetch(&self) -> Result<Vec<Departure>, ApplicationError> {
        let query = DepartureQuery::new(self.config.stop.id.clone())
            .with_limit(self.config.departure_limit)
            .with_transport_modes(self.config.transport_modes.clone());
        self.source.fetch_departures(&query).await
    }

    fn record(
        &mut self,
        result: Result<Vec<Departure>, ApplicationError>,
        now: DateTime<Utc>,
    ) -> MonitorEvent {
        match result {
            Ok(departures) => {
                if self.consecutive_failures > 0 {
                    info!(
                        after_failures = self.consecutive_failures,
                        "Departure source recovered"
                    );
                }
                self.consecutive_failures = 0;

                let tracked = track_departures(
                    &departures,
                    &self.config.target_destination,
                    &self.config.policy,
                    now,
                );
                debug!(
                    fetched = departures.len(),
                    matching = tracked.len(),
                    "Poll cycle complete"
                );

                MonitorEvent::Snapshot(DepartureSnapshot {
                    stop: self.config.stop.clone(),
                    target_destination: self.config.target_destination.clone(),
                    synced_at: now,
                    departures: tracked,
                })
            },
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    error = %e,
                    consecutive_failures = self.consecutive_failures,
                    "Departure source unavailable"
                );
                MonitorEvent::SourceUnavailable {
                    message: e.to_string(),
                    consecutive_failures: self.consecutive_failures,
                    occurred_at: now,
                }
            },
        }
    }
}
