//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod dashboard_port;
mod departure_source_port;

#[cfg(test)]
pub use dashboard_port::MockDashboardPort;
pub use dashboard_port::{DashboardPort, DepartureSnapshot, MonitorEvent, TrackedDeparture};
#[cfg(test)]
pub use departure_source_port::MockDepartureSourcePort;
pub use departure_source_port::{DepartureQuery, DepartureSourcePort};
