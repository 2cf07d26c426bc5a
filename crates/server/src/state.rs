//! Application state shared across handlers.

use atlas_core::config::AppConfig;
use atlas_metadata::CountryStore;
use atlas_upstream::UpstreamClient;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn CountryStore>,
    pub upstream: Arc<dyn UpstreamClient>,
    /// Serializes refresh passes. Overlapping refresh requests queue behind
    /// the running pass instead of interleaving writes on the same rows.
    pub refresh_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn CountryStore>,
        upstream: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            config,
            store,
            upstream,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }
}
