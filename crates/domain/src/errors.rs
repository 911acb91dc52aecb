//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Walk duration outside the accepted range
    #[error("Invalid walk duration: {0}")]
    InvalidWalkDuration(String),

    /// Unknown transport mode name
    #[error("Invalid transport mode: {0}")]
    InvalidTransportMode(String),
}
