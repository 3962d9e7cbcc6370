//! HTTP entry point for the contribution calendar
//!
//! Serves `GET /api/github-contributions?username=<handle>`.
//!
//! ## Environment Variables
//!
//! - `CONTRIB_CONFIG`: Path to the TOML configuration (default: `config.toml`)
//! - `RUST_LOG`: Log filter (e.g., `info`, `contrib_calendar=debug`)
//! - `ROCKET_*`: Rocket overrides, taking precedence over the configuration file

use std::sync::Arc;

use contrib_calendar::{models::Config, server, services::ContributionFetcher};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the HTTP server.
#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config_path =
        std::env::var("CONTRIB_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load_or_default(&config_path);
    config.validate()?;

    let fetcher = Arc::new(ContributionFetcher::from_config(&config)?);
    info!(
        "Contribution server starting on {}:{} (default handle {}, cache {})",
        config.server.address,
        config.server.port,
        fetcher.default_username(),
        if config.cache.enabled { "on" } else { "off" }
    );

    let _ = server::build(fetcher, &config.server).launch().await?;
    Ok(())
}
