//! Transit data models
//!
//! Typed representations of departures and stations as returned by the
//! MVG departure API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MVG transport type
///
/// Serialized with the upper-case names the API uses in `transportType`
/// fields and in the `transportTypes` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportType {
    /// City bus
    Bus,
    /// Regional (MVV) bus
    RegionalBus,
    /// Tram
    Tram,
    /// U-Bahn
    Ubahn,
    /// S-Bahn
    Sbahn,
    /// Regional / long-distance train
    Bahn,
    /// Ferry
    Schiff,
    /// On-demand shuttle
    Ruftaxi,
    /// Anything the client does not know about
    #[serde(other)]
    Unknown,
}

impl TransportType {
    /// Value used in the `transportTypes` query parameter
    #[must_use]
    pub const fn as_param(&self) -> &'static str {
        match self {
            Self::Bus => "BUS",
            Self::RegionalBus => "REGIONAL_BUS",
            Self::Tram => "TRAM",
            Self::Ubahn => "UBAHN",
            Self::Sbahn => "SBAHN",
            Self::Bahn => "BAHN",
            Self::Schiff => "SCHIFF",
            Self::Ruftaxi => "RUFTAXI",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Join several types into a single query parameter value
    #[must_use]
    pub fn join_params(types: &[Self]) -> String {
        types
            .iter()
            .filter(|t| **t != Self::Unknown)
            .map(Self::as_param)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

/// A departure from the departure monitor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MvgDeparture {
    /// Timetabled departure
    pub planned_departure_time: DateTime<Utc>,
    /// Realtime prediction, if the vehicle reports its position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realtime_departure_time: Option<DateTime<Utc>>,
    /// Whether realtime data backs this departure
    pub realtime: bool,
    /// Delay in minutes (None = unknown)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_in_minutes: Option<i64>,
    /// Vehicle type
    pub transport_type: TransportType,
    /// Line label (e.g. "230", "U6")
    pub label: String,
    /// Destination headsign
    pub destination: String,
    /// Whether the trip is cancelled
    pub cancelled: bool,
    /// Platform or stop position number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl MvgDeparture {
    /// Best known departure instant: realtime when available, planned otherwise
    #[must_use]
    pub fn departure_time(&self) -> DateTime<Utc> {
        self.realtime_departure_time
            .unwrap_or(self.planned_departure_time)
    }
}

impl fmt::Display for MvgDeparture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} → {}",
            self.departure_time().format("%H:%M"),
            self.label,
            self.destination
        )
    }
}

/// A station returned by the location search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Station {
    /// Global stop id (e.g. "de:09162:1")
    pub global_id: String,
    /// Station name
    pub name: String,
    /// Municipality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Transport types serving the station
    #[serde(default)]
    pub transport_types: Vec<TransportType>,
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.place {
            Some(place) => write!(f, "{}, {place}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
