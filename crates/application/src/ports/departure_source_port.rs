//! Departure source port
//!
//! The monitor asks this port for the upcoming departures at one stop.
//! Adapters in the infrastructure layer implement it on top of a transit API.

use async_trait::async_trait;
use domain::{Departure, TransitStop, TransportMode};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Options for a departure request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureQuery {
    /// Stop identifier as understood by the source
    pub stop_id: String,
    /// Maximum number of departures to request
    pub limit: u8,
    /// Vehicle types to request (empty = all)
    pub transport_modes: Vec<TransportMode>,
}

impl DepartureQuery {
    /// Create a query for all vehicle types at `stop_id`
    #[must_use]
    pub fn new(stop_id: impl Into<String>) -> Self {
        Self {
            stop_id: stop_id.into(),
            limit: 10,
            transport_modes: Vec::new(),
        }
    }

    /// Set maximum number of departures
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit;
        self
    }

    /// Restrict to the given vehicle types
    #[must_use]
    pub fn with_transport_modes(mut self, modes: Vec<TransportMode>) -> Self {
        self.transport_modes = modes;
        self
    }
}

/// Port for fetching departures
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DepartureSourcePort: Send + Sync {
    /// Fetch the upcoming departures at a stop, in source order
    async fn fetch_departures(
        &self,
        query: &DepartureQuery,
    ) -> Result<Vec<Departure>, ApplicationError>;

    /// Search stops by name, best match first
    async fn search_stops(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<TransitStop>, ApplicationError>;

    /// Check if the departure source is reachable
    async fn is_available(&self) -> bool;
}
