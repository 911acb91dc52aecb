//! Domain entities

mod departure;
mod transit_stop;

pub use departure::Departure;
pub use transit_stop::TransitStop;
