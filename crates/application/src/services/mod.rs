//! Application services - Use case implementations

mod departure_monitor;
mod stop_resolver;

pub use departure_monitor::{DepartureMonitor, MonitorConfig, RefreshHandle, track_departures};
pub use stop_resolver::{StopResolver, StopSelector};
