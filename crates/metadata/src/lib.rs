//! Country store abstraction and implementations for Atlas.
//!
//! This crate provides the persistence layer:
//! - Country rows (name-keyed, case-insensitive) with refresh timestamps
//! - Filtered and sorted listings
//! - The transactional refresh pass with row-level failure isolation
//! - The singleton global refresh timestamp

pub mod error;
pub mod models;
pub mod postgres;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use postgres::PostgresStore;
pub use store::{CountryStore, SqliteStore};

use atlas_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a country store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn CountryStore>> {
    match config {
        MetadataConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn CountryStore>)
        }
        MetadataConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            max_connections,
        } => {
            let store = if let Some(url) = url {
                // URL takes precedence over individual parameters
                tracing::info!("Connecting to PostgreSQL using connection URL");
                PostgresStore::from_url(url, *max_connections).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *max_connections,
                )
                .await?
            } else {
                return Err(MetadataError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Ok(Arc::new(store) as Arc<dyn CountryStore>)
        }
    }
}
