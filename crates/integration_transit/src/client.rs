//! MVG departure monitor client
//!
//! Provides stop departures and station search using the public
//! [MVG](https://www.mvg.de) `bgw-pt/v3` API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::{MAX_DEPARTURE_LIMIT, TransitConfig};
use crate::error::TransitError;
use crate::models::{MvgDeparture, Station, TransportType};

/// Trait for transit service clients
#[async_trait]
pub trait TransitClient: Send + Sync {
    /// Fetch upcoming departures at a station, ordered by departure time
    async fn departures(
        &self,
        station_id: &str,
        limit: u8,
        transport_types: &[TransportType],
    ) -> Result<Vec<MvgDeparture>, TransitError>;

    /// Search for stations by name
    async fn search_stations(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<Station>, TransitError>;

    /// Check if the transit service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Client for the MVG departure API
#[derive(Debug)]
pub struct MvgTransitClient {
    client: Client,
    config: TransitConfig,
}

impl MvgTransitClient {
    /// Create a new MVG client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &TransitConfig) -> Result<Self, TransitError> {
        config
            .validate()
            .map_err(TransitError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransitError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Send a GET request and return the body of a successful response
    async fn get_body(&self, url: &str, params: &[(&str, String)]) -> Result<String, TransitError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransitError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    TransitError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TransitError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::BAD_GATEWAY {
            return Err(TransitError::ServiceUnavailable(format!("HTTP {status}")));
        }

        if !status.is_success() {
            return Err(TransitError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| TransitError::ParseError(e.to_string()))
    }

    /// Parse the raw departures response into typed models
    fn parse_departures_response(body: &str) -> Result<Vec<MvgDeparture>, TransitError> {
        let raw: Vec<RawDeparture> =
            serde_json::from_str(body).map_err(|e| TransitError::ParseError(e.to_string()))?;

        raw.into_iter().map(Self::convert_departure).collect()
    }

    /// Convert a raw departure to a typed departure
    fn convert_departure(raw: RawDeparture) -> Result<MvgDeparture, TransitError> {
        let planned_departure_time = millis_to_utc(raw.planned_departure_time)?;
        let realtime_departure_time = raw
            .realtime_departure_time
            .map(millis_to_utc)
            .transpose()?;

        Ok(MvgDeparture {
            planned_departure_time,
            realtime_departure_time,
            realtime: raw.realtime.unwrap_or(false),
            delay_in_minutes: raw.delay_in_minutes,
            transport_type: raw.transport_type.unwrap_or(TransportType::Unknown),
            label: raw.label.unwrap_or_default(),
            destination: raw.destination.unwrap_or_default(),
            cancelled: raw.cancelled.unwrap_or(false),
            platform: raw.platform.map(RawPlatform::into_string),
        })
    }

    /// Parse the raw locations response, keeping stations only
    fn parse_locations_response(body: &str) -> Result<Vec<Station>, TransitError> {
        let raw: Vec<RawLocation> =
            serde_json::from_str(body).map_err(|e| TransitError::ParseError(e.to_string()))?;

        Ok(raw
            .into_iter()
            .filter(|loc| loc.location_type.as_deref() == Some("STATION"))
            .filter_map(|loc| {
                Some(Station {
                    global_id: loc.global_id?,
                    name: loc.name.unwrap_or_default(),
                    place: loc.place,
                    transport_types: loc.transport_types.unwrap_or_default(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl TransitClient for MvgTransitClient {
    #[instrument(skip(self, transport_types), fields(types = %TransportType::join_params(transport_types)))]
    async fn departures(
        &self,
        station_id: &str,
        limit: u8,
        transport_types: &[TransportType],
    ) -> Result<Vec<MvgDeparture>, TransitError> {
        if station_id.trim().is_empty() {
            return Err(TransitError::InvalidStation(
                "Station id must not be empty".to_string(),
            ));
        }

        let url = format!("{}/departures", self.config.base_url);
        let limit = limit.clamp(1, MAX_DEPARTURE_LIMIT);

        let mut params: Vec<(&str, String)> = vec![
            ("globalId", station_id.to_string()),
            ("limit", limit.to_string()),
            ("offsetInMinutes", self.config.offset_minutes.to_string()),
        ];

        let types = TransportType::join_params(transport_types);
        if !types.is_empty() {
            params.push(("transportTypes", types));
        }

        debug!(?url, "Fetching departures");

        let body = self.get_body(&url, &params).await?;
        let departures = Self::parse_departures_response(&body)?;

        if departures.is_empty() {
            warn!(%station_id, "No departures returned");
        }

        debug!(count = departures.len(), "Departures fetched");
        Ok(departures)
    }

    #[instrument(skip(self))]
    async fn search_stations(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<Station>, TransitError> {
        if query.trim().is_empty() {
            return Err(TransitError::InvalidStation(
                "Search query must not be empty".to_string(),
            ));
        }

        let url = format!("{}/locations", self.config.base_url);
        let params = [
            ("query", query.to_string()),
            ("locationTypes", "STATION".to_string()),
        ];

        debug!(?url, ?query, "Searching stations by name");

        let body = self.get_body(&url, &params).await?;
        let mut stations = Self::parse_locations_response(&body)?;
        stations.truncate(usize::from(max_results));

        Ok(stations)
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/locations", self.config.base_url);
        self.client
            .get(&url)
            .query(&[("query", "Marienplatz"), ("locationTypes", "STATION")])
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }
}

/// Convert an epoch-milliseconds timestamp
fn millis_to_utc(millis: i64) -> Result<DateTime<Utc>, TransitError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| TransitError::ParseError(format!("timestamp out of range: {millis}")))
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeparture {
    planned_departure_time: i64,
    realtime_departure_time: Option<i64>,
    realtime: Option<bool>,
    delay_in_minutes: Option<i64>,
    transport_type: Option<TransportType>,
    label: Option<String>,
    destination: Option<String>,
    cancelled: Option<bool>,
    platform: Option<RawPlatform>,
}

/// Platforms come back as numbers for buses and strings for some rail stops
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPlatform {
    Number(i64),
    Text(String),
}

impl RawPlatform {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    #[serde(rename = "type")]
    location_type: Option<String>,
    global_id: Option<String>,
    name: Option<String>,
    place: Option<String>,
    transport_types: Option<Vec<TransportType>>,
}
