//! Public transit integration for BusTracker
//!
//! Provides stop departures and station search via the MVG
//! (Münchner Verkehrsgesellschaft) `bgw-pt/v3` API.
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern: [`TransitClient`] defines the
//! interface, implemented by [`MvgTransitClient`]. Wire types stay private to
//! the client; callers see [`MvgDeparture`] and [`Station`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_transit::{MvgTransitClient, TransitClient, TransitConfig, TransportType};
//!
//! let client = MvgTransitClient::new(&TransitConfig::default())?;
//! let departures = client
//!     .departures("de:09184:2510", 10, &[TransportType::RegionalBus])
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{MvgTransitClient, TransitClient};
pub use config::{MAX_DEPARTURE_LIMIT, TransitConfig};
pub use error::TransitError;
pub use models::{MvgDeparture, Station, TransportType};
