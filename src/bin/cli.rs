//! Contribution calendar CLI
//!
//! Local execution entry point. For the HTTP API, use `contrib-calendar-server`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use contrib_calendar::{
    calendar::CalendarView,
    error::{AppError, Result},
    models::{Config, ContributionResult, ParsedCalendar, Username},
    services::{ContributionFetcher, parser},
};
use futures::stream::{self, StreamExt};
use serde::Serialize;

/// contrib-calendar - GitHub contribution calendar fetcher
#[derive(Parser, Debug)]
#[command(
    name = "contrib-calendar",
    version,
    about = "Fetch and lay out GitHub contribution calendars"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch calendars from the upstream (default handle when none given)
    Fetch {
        /// Handles to fetch
        usernames: Vec<String>,

        /// Print the week grid instead of the raw envelope
        #[arg(long)]
        grid: bool,
    },

    /// Parse a captured contribution page from disk
    Parse {
        /// Saved HTML page
        file: PathBuf,

        /// Handle to stamp on the result (default: configured handle)
        #[arg(long)]
        username: Option<String>,
    },

    /// Parse a captured page and print its week grid
    Grid {
        /// Saved HTML page
        file: PathBuf,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn read_page(file: &Path) -> Result<ParsedCalendar> {
    let markup = tokio::fs::read_to_string(file).await?;
    let parsed = parser::parse_calendar(&markup);
    log::info!(
        "Parsed {} days from {} (declared total: {:?})",
        parsed.days.len(),
        file.display(),
        parsed.declared_total
    );
    Ok(parsed)
}

async fn fetch(config: &Config, usernames: Vec<String>, grid: bool) -> Result<()> {
    let fetcher = Arc::new(ContributionFetcher::from_config(config)?);
    let requests: Vec<Option<String>> = if usernames.is_empty() {
        vec![None]
    } else {
        usernames.into_iter().map(Some).collect()
    };

    let mut results = stream::iter(requests)
        .map(|username| {
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.fetch(username.as_deref()).await }
        })
        .buffered(config.cli.max_concurrent.max(1));

    let mut failure = None;
    while let Some(result) = results.next().await {
        match result {
            Ok(result) if grid => print_json(&CalendarView::new(result.total, &result.days))?,
            Ok(result) => print_json(&result)?,
            Err(e) => {
                log::error!("{e}");
                failure = Some(e);
            }
        }
    }

    failure.map_or(Ok(()), Err)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Fetch { usernames, grid } => {
            config.validate()?;
            fetch(&config, usernames, grid).await?;
        }

        Command::Parse { file, username } => {
            let parsed = read_page(&file).await?;
            if parsed.days.is_empty() {
                return Err(AppError::validation(format!(
                    "no contribution cells found in {}",
                    file.display()
                )));
            }
            let default = config.upstream.default_username()?;
            let username = Username::sanitize(username.as_deref(), &default);
            print_json(&ContributionResult::from_parsed(username, parsed, Utc::now()))?;
        }

        Command::Grid { file } => {
            let parsed = read_page(&file).await?;
            print_json(&CalendarView::new(parsed.total(), &parsed.days))?;
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("Upstream: {}", config.upstream.url_template);
            log::info!(
                "Default handle: {}, timeout: {}s, cache TTL: {}s",
                config.upstream.default_username,
                config.upstream.timeout_secs,
                config.cache.ttl_secs
            );
        }
    }

    Ok(())
}
