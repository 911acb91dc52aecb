//! Application layer - Use cases and orchestration
//!
//! Defines the ports the departure monitor talks through and the services
//! that drive a poll cycle: stop resolution and the monitoring loop.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
