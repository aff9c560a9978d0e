//! Application state for the web layer.

use std::sync::Arc;

use crate::matcher::MatcherConfig;
use crate::store::MemoryTripStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Trip, vehicle and driver storage
    pub store: Arc<MemoryTripStore>,

    /// Trip search configuration
    pub matcher: Arc<MatcherConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: MemoryTripStore, matcher: MatcherConfig) -> Self {
        Self {
            store: Arc::new(store),
            matcher: Arc::new(matcher),
        }
    }
}
