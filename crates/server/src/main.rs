//! Atlas server binary.

use anyhow::{Context, Result};
use atlas_core::config::AppConfig;
use atlas_server::{create_router, AppState};
use atlas_upstream::HttpUpstreamClient;
use clap::Parser;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Atlas - country and currency data service
#[derive(Parser, Debug)]
#[command(name = "atlasd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "ATLAS_CONFIG",
        default_value = "config/atlasd.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Atlas v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration. The file is optional: every setting has a default
    // and env vars can provide or override everything
    // (e.g. ATLAS_SERVER__BIND, ATLAS_METADATA__HOST, ATLAS_METADATA__PASSWORD).
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("ATLAS_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    config
        .metadata
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid metadata configuration")?;

    // Initialize the country store (runs migrations)
    let store = atlas_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    tracing::info!("Metadata store initialized");

    // Verify connectivity before accepting requests
    store
        .health_check()
        .await
        .context("metadata store health check failed")?;

    // Upstream client for the two public data sources
    let upstream = Arc::new(
        HttpUpstreamClient::new(&config.upstream)
            .context("failed to build upstream client")?,
    );

    // Create application state and router
    let state = AppState::new(config.clone(), store, upstream);
    let router = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    tracing::info!(bind = %config.server.bind, "Atlas server listening");

    axum::serve(listener, router).await.context("server error")?;

    Ok(())
}
