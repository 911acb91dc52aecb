//! Domain layer for BusTracker
//!
//! Contains the departure model, the leave-time decision engine and the
//! destination filter. This layer performs no I/O.

pub mod decision;
pub mod entities;
pub mod errors;
pub mod filter;
pub mod value_objects;

pub use decision::{LeaveDecision, LeavePolicy, MAX_WALK_MINUTES, decide};
pub use entities::*;
pub use errors::DomainError;
pub use filter::filter_by_destination;
pub use value_objects::*;
