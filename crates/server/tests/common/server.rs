//! Server test utilities.

use super::upstream::MockUpstream;
use atlas_core::config::{AppConfig, MetadataConfig, ServerConfig, SummaryConfig, UpstreamConfig};
use atlas_metadata::{CountryStore, SqliteStore};
use atlas_server::{create_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server with an empty mock upstream.
    pub async fn new() -> Self {
        Self::with_upstream(MockUpstream::default()).await
    }

    /// Create a test server over the given mock upstream.
    pub async fn with_upstream(upstream: MockUpstream) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        // Create the store over a temp-dir SQLite database
        let db_path = temp_dir.path().join("atlas.db");
        let store: Arc<dyn CountryStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create country store"),
        );

        let config = AppConfig {
            server: ServerConfig::default(),
            metadata: MetadataConfig::Sqlite {
                path: db_path.clone(),
            },
            upstream: UpstreamConfig::default(),
            summary: SummaryConfig {
                output_path: temp_dir.path().join("summary.png"),
            },
        };

        let state = AppState::new(config, store, Arc::new(upstream));
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying store.
    pub fn store(&self) -> Arc<dyn CountryStore> {
        self.state.store.clone()
    }

    /// Where the summary image is written for this server.
    pub fn summary_path(&self) -> PathBuf {
        self.state.config.summary.output_path.clone()
    }
}
