//! Value Objects - Immutable, identity-less domain primitives

mod transport_mode;
mod urgency;

pub use transport_mode::TransportMode;
pub use urgency::{PREP_THRESHOLD_MINUTES, Urgency, WAIT_THRESHOLD_MINUTES};
