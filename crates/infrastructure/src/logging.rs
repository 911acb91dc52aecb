//! Tracing subscriber setup
//!
//! Logs go to stderr so the dashboard on stdout stays readable.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The filter directives could not be parsed
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected directives
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Pick the filter directives to use
///
/// `RUST_LOG` wins, then the command-line override, then the configured
/// filter.
#[must_use]
pub fn effective_filter(
    config: &LoggingConfig,
    override_filter: Option<&str>,
    rust_log: Option<&str>,
) -> String {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .or(override_filter)
        .unwrap_or(&config.log_filter)
        .to_string()
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_logging(
    config: &LoggingConfig,
    override_filter: Option<&str>,
) -> Result<(), LoggingError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = effective_filter(config, override_filter, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directives).map_err(|e| LoggingError::InvalidFilter {
        filter: directives.clone(),
        reason: e.to_string(),
    })?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LoggingConfig {
        LoggingConfig {
            log_filter: "info".to_string(),
            json: false,
        }
    }

    #[test]
    fn test_rust_log_wins() {
        let filter = effective_filter(&config(), Some("debug"), Some("trace"));
        assert_eq!(filter, "trace");
    }

    #[test]
    fn test_override_beats_config() {
        let filter = effective_filter(&config(), Some("debug"), None);
        assert_eq!(filter, "debug");
    }

    #[test]
    fn test_blank_rust_log_is_ignored() {
        let filter = effective_filter(&config(), None, Some("  "));
        assert_eq!(filter, "info");
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = LoggingConfig {
            log_filter: "info,bustracker=loud".to_string(),
            json: false,
        };
        // Skip when the environment forces a filter.
        if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
            return;
        }
        let result = init_logging(&config, None);
        assert!(matches!(result, Err(LoggingError::InvalidFilter { .. })));
    }
}
