//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer on top of the MVG
//! client and a tokio channel, and provides configuration loading, logging
//! setup and retry helpers.

pub mod adapters;
pub mod config;
pub mod logging;
pub mod retry;

pub use adapters::*;
pub use config::{AppConfig, LoggingConfig, TrackerConfig, TransitAppConfig};
pub use logging::{LoggingError, init_logging};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
