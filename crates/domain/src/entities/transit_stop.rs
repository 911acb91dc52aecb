//! Transit stop entity

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stop (station) that departures can be requested for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitStop {
    /// Operator-wide stop identifier (e.g. "de:09162:1")
    pub id: String,
    /// Stop name
    pub name: String,
    /// Municipality the stop belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

impl TransitStop {
    /// Create a stop without place information
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            place: None,
        }
    }

    /// Attach the municipality
    #[must_use]
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }
}

impl fmt::Display for TransitStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.place {
            Some(place) => write!(f, "{}, {place}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
