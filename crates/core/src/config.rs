//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata store backend.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Upstream data source settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Summary image settings.
    #[serde(default)]
    pub summary: SummaryConfig,
}

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database (recommended for testing and single-node deployments).
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
    /// PostgreSQL database.
    Postgres {
        /// Connection URL (optional if using individual fields).
        /// Takes precedence over individual fields if both are provided.
        url: Option<String>,
        /// Database host (e.g., "localhost" or "db.example.com").
        host: Option<String>,
        /// Database port (default: 5432).
        #[serde(default = "default_pg_port")]
        port: Option<u16>,
        /// Database username.
        username: Option<String>,
        /// Database password.
        /// WARNING: Prefer the ATLAS_METADATA__PASSWORD env var over storing in config.
        password: Option<String>,
        /// Database name.
        database: Option<String>,
        /// Maximum connections in the pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

fn default_pg_port() -> Option<u16> {
    Some(5432)
}

fn default_max_connections() -> u32 {
    10
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/atlas.db"),
        }
    }
}

impl MetadataConfig {
    /// Validate metadata configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            MetadataConfig::Sqlite { .. } => Ok(()),
            MetadataConfig::Postgres {
                url,
                host,
                database,
                ..
            } => match (url.as_ref(), host.as_ref(), database.as_ref()) {
                (Some(_), _, _) => Ok(()),
                (None, Some(_), Some(_)) => Ok(()),
                (None, None, _) => {
                    Err("postgres config requires either 'url' or 'host' + 'database'".to_string())
                }
                (None, Some(_), None) => {
                    Err("postgres config requires 'database' when using individual fields"
                        .to_string())
                }
            },
        }
    }
}

/// Upstream data source configuration.
///
/// Both endpoints are public, unauthenticated APIs. The timeout bounds the
/// whole request; there are no retries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Country metadata endpoint.
    #[serde(default = "default_countries_url")]
    pub countries_url: String,
    /// USD exchange rate endpoint.
    #[serde(default = "default_rates_url")]
    pub rates_url: String,
    /// Total per-request timeout in seconds.
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_countries_url() -> String {
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies"
        .to_string()
}

fn default_rates_url() -> String {
    "https://open.er-api.com/v6/latest/USD".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            countries_url: default_countries_url(),
            rates_url: default_rates_url(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    /// Get the per-request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Summary image configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Where the rendered PNG is written.
    #[serde(default = "default_summary_output_path")]
    pub output_path: PathBuf,
}

fn default_summary_output_path() -> PathBuf {
    PathBuf::from("./data/summary.png")
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            output_path: default_summary_output_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_url_alone_is_valid() {
        let config = MetadataConfig::Postgres {
            url: Some("postgres://localhost/atlas".to_string()),
            host: None,
            port: default_pg_port(),
            username: None,
            password: None,
            database: None,
            max_connections: 10,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn postgres_host_requires_database() {
        let config = MetadataConfig::Postgres {
            url: None,
            host: Some("localhost".to_string()),
            port: default_pg_port(),
            username: Some("atlas".to_string()),
            password: None,
            database: None,
            max_connections: 10,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn postgres_without_url_or_host_is_invalid() {
        let config = MetadataConfig::Postgres {
            url: None,
            host: None,
            port: default_pg_port(),
            username: None,
            password: None,
            database: None,
            max_connections: 10,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_point_at_public_endpoints() {
        let config = UpstreamConfig::default();
        assert!(config.countries_url.starts_with("https://restcountries.com/"));
        assert!(config.rates_url.starts_with("https://open.er-api.com/"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
