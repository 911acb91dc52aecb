//! Transport mode value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Kind of vehicle serving a departure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// City bus
    Bus,
    /// Regional bus (e.g. MVV lines crossing the city boundary)
    RegionalBus,
    /// Tram / Straßenbahn
    Tram,
    /// U-Bahn
    Subway,
    /// S-Bahn
    Suburban,
    /// Regional or long-distance train
    Train,
    /// Ferry
    Ferry,
    /// On-demand shuttle / Ruftaxi
    OnDemand,
}

impl TransportMode {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bus => "Bus",
            Self::RegionalBus => "Regional Bus",
            Self::Tram => "Tram",
            Self::Subway => "U-Bahn",
            Self::Suburban => "S-Bahn",
            Self::Train => "Train",
            Self::Ferry => "Ferry",
            Self::OnDemand => "Ruftaxi",
        }
    }

    /// Whether this mode is road-bound bus service
    #[must_use]
    pub const fn is_bus(&self) -> bool {
        matches!(self, Self::Bus | Self::RegionalBus)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for TransportMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "bus" => Ok(Self::Bus),
            "regional_bus" => Ok(Self::RegionalBus),
            "tram" => Ok(Self::Tram),
            "subway" | "ubahn" | "u_bahn" => Ok(Self::Subway),
            "suburban" | "sbahn" | "s_bahn" => Ok(Self::Suburban),
            "train" | "bahn" => Ok(Self::Train),
            "ferry" => Ok(Self::Ferry),
            "on_demand" | "ruftaxi" => Ok(Self::OnDemand),
            _ => Err(DomainError::InvalidTransportMode(s.to_string())),
        }
    }
}
