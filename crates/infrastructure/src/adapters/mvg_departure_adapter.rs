//! MVG departure adapter - Implements DepartureSourcePort using integration_transit

use application::error::ApplicationError;
use application::ports::{DepartureQuery, DepartureSourcePort};
use async_trait::async_trait;
use domain::{Departure, TransitStop, TransportMode};
use integration_transit::{
    MvgDeparture, MvgTransitClient, Station, TransitClient, TransitError, TransportType,
};
use tracing::{debug, instrument};

use crate::config::TransitAppConfig;

/// Adapter for the MVG departure API
pub struct MvgDepartureAdapter {
    client: MvgTransitClient,
}

impl std::fmt::Debug for MvgDepartureAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MvgDepartureAdapter")
            .field("client", &"MvgTransitClient")
            .finish()
    }
}

impl MvgDepartureAdapter {
    /// Wrap an existing client
    #[must_use]
    pub const fn new(client: MvgTransitClient) -> Self {
        Self { client }
    }

    /// Build the adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &TransitAppConfig) -> Result<Self, ApplicationError> {
        let client = MvgTransitClient::new(&config.to_transit_config())
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(client))
    }

    /// Convert an MVG transport type to a domain transport mode
    const fn convert_type(transport_type: TransportType) -> Option<TransportMode> {
        match transport_type {
            TransportType::Bus => Some(TransportMode::Bus),
            TransportType::RegionalBus => Some(TransportMode::RegionalBus),
            TransportType::Tram => Some(TransportMode::Tram),
            TransportType::Ubahn => Some(TransportMode::Subway),
            TransportType::Sbahn => Some(TransportMode::Suburban),
            TransportType::Bahn => Some(TransportMode::Train),
            TransportType::Schiff => Some(TransportMode::Ferry),
            TransportType::Ruftaxi => Some(TransportMode::OnDemand),
            TransportType::Unknown => None,
        }
    }

    /// Convert a domain transport mode to the MVG request parameter
    const fn convert_mode(mode: TransportMode) -> TransportType {
        match mode {
            TransportMode::Bus => TransportType::Bus,
            TransportMode::RegionalBus => TransportType::RegionalBus,
            TransportMode::Tram => TransportType::Tram,
            TransportMode::Subway => TransportType::Ubahn,
            TransportMode::Suburban => TransportType::Sbahn,
            TransportMode::Train => TransportType::Bahn,
            TransportMode::Ferry => TransportType::Schiff,
            TransportMode::OnDemand => TransportType::Ruftaxi,
        }
    }

    fn convert_departure(raw: MvgDeparture) -> Option<Departure> {
        let Some(mode) = Self::convert_type(raw.transport_type) else {
            debug!(line = %raw.label, "Skipping departure with unknown transport type");
            return None;
        };

        let mut departure = Departure::new(raw.label.clone(), raw.destination.clone(), raw.departure_time())
            .with_planned_time(raw.planned_departure_time)
            .with_transport_mode(mode);
        if let Some(delay) = raw.delay_in_minutes {
            departure = departure.with_delay_minutes(delay);
        }
        if raw.cancelled {
            departure = departure.cancelled();
        }
        if let Some(platform) = raw.platform {
            departure = departure.with_platform(platform);
        }
        Some(departure)
    }

    fn convert_station(station: Station) -> TransitStop {
        let stop = TransitStop::new(station.global_id, station.name);
        match station.place {
            Some(place) if !place.is_empty() => stop.with_place(place),
            _ => stop,
        }
    }

    fn map_error(err: TransitError) -> ApplicationError {
        match err {
            TransitError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            TransitError::StationNotFound(name) => ApplicationError::NotFound(format!("stop '{name}'")),
            TransitError::InvalidStation(msg) | TransitError::ConfigurationError(msg) => {
                ApplicationError::Configuration(msg)
            },
            other => ApplicationError::ExternalService(format!("MVG request failed: {other}")),
        }
    }
}

#[async_trait]
impl DepartureSourcePort for MvgDepartureAdapter {
    #[instrument(skip(self), fields(stop_id = %query.stop_id))]
    async fn fetch_departures(
        &self,
        query: &DepartureQuery,
    ) -> Result<Vec<Departure>, ApplicationError> {
        let types: Vec<TransportType> = query
            .transport_modes
            .iter()
            .copied()
            .map(Self::convert_mode)
            .collect();

        let raw = self
            .client
            .departures(&query.stop_id, query.limit, &types)
            .await
            .map_err(Self::map_error)?;

        Ok(raw.into_iter().filter_map(Self::convert_departure).collect())
    }

    #[instrument(skip(self))]
    async fn search_stops(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<TransitStop>, ApplicationError> {
        let stations = self
            .client
            .search_stations(query, max_results)
            .await
            .map_err(Self::map_error)?;

        Ok(stations.into_iter().map(Self::convert_station).collect())
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
