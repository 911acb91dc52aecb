//! Stop resolution
//!
//! Turns the configured stop (a name or a known id) into a [`TransitStop`]
//! before the monitor starts.

use std::sync::Arc;

use domain::TransitStop;
use tracing::{debug, info, instrument};

use crate::error::ApplicationError;
use crate::ports::DepartureSourcePort;

/// How many search hits to consider when resolving a name
const SEARCH_CANDIDATES: u8 = 8;

/// The stop as configured by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopSelector {
    /// A known source id; no lookup needed
    Id {
        /// Source stop id
        id: String,
        /// Display name
        name: String,
    },
    /// A stop name that has to be looked up
    Name(String),
}

/// Resolves configured stops against the departure source
pub struct StopResolver {
    source: Arc<dyn DepartureSourcePort>,
}

impl std::fmt::Debug for StopResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopResolver").finish_non_exhaustive()
    }
}

impl StopResolver {
    /// Create a new resolver
    #[must_use]
    pub fn new(source: Arc<dyn DepartureSourcePort>) -> Self {
        Self { source }
    }

    /// Resolve a selector to a stop
    ///
    /// A name resolves to the hit whose name matches exactly (ignoring case),
    /// otherwise to the source's best match.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::NotFound`] when the search has no hits,
    /// [`ApplicationError::Configuration`] for a blank name, or the source's
    /// error when the search fails.
    #[instrument(skip(self))]
    pub async fn resolve(&self, selector: &StopSelector) -> Result<TransitStop, ApplicationError> {
        let name = match selector {
            StopSelector::Id { id, name } => {
                debug!(stop_id = %id, "Using configured stop id");
                return Ok(TransitStop::new(id.clone(), name.clone()));
            },
            StopSelector::Name(name) => name.trim(),
        };

        if name.is_empty() {
            return Err(ApplicationError::Configuration(
                "stop name must not be empty".to_string(),
            ));
        }

        let mut candidates = self.source.search_stops(name, SEARCH_CANDIDATES).await?;
        if candidates.is_empty() {
            return Err(ApplicationError::NotFound(format!("stop '{name}'")));
        }

        let wanted = name.to_lowercase();
        let index = candidates
            .iter()
            .position(|stop| stop.name.to_lowercase() == wanted)
            .unwrap_or(0);
        let stop = candidates.swap_remove(index);

        info!(stop_id = %stop.id, stop = %stop, "Resolved stop");
        Ok(stop)
    }

    /// Search stops by name for display
    ///
    /// # Errors
    ///
    /// Returns the source's error when the search fails.
    pub async fn search(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<TransitStop>, ApplicationError> {
        self.source.search_stops(query.trim(), max_results).await
    }
}
