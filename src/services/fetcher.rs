// src/services/fetcher.rs

//! Contribution fetcher service.
//!
//! Turns an untrusted handle into a parsed [`ContributionResult`], going
//! through the page cache and classifying every failure into an [`AppError`]
//! whose status class the HTTP layer reports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, ContributionResult, UpstreamConfig, Username};
use crate::services::cache::{MemoryCache, NoCache, PageCache, get_or_fetch};
use crate::services::parser::parse_calendar;
use crate::utils::http::create_async_client;

/// Source of raw contribution pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page body at `url`.
    ///
    /// A non-success status must surface as [`AppError::UpstreamStatus`].
    async fn fetch_page(&self, url: &Url) -> Result<String>;
}

/// Live upstream over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream_status(url, status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Fetches and parses contribution calendars, one attempt per call.
pub struct ContributionFetcher {
    upstream: UpstreamConfig,
    default_username: Username,
    source: Arc<dyn PageSource>,
    cache: Arc<dyn PageCache>,
    ttl: Duration,
}

impl ContributionFetcher {
    /// Create a fetcher. Fails if the configured default handle is invalid.
    pub fn new(
        upstream: UpstreamConfig,
        source: Arc<dyn PageSource>,
        cache: Arc<dyn PageCache>,
        ttl: Duration,
    ) -> Result<Self> {
        let default_username = upstream.default_username()?;
        Ok(Self {
            upstream,
            default_username,
            source,
            cache,
            ttl,
        })
    }

    /// Create a fetcher against the live upstream, cached as configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = Arc::new(HttpPageSource::new(&config.upstream)?);
        let cache: Arc<dyn PageCache> = if config.cache.enabled {
            Arc::new(MemoryCache::new())
        } else {
            Arc::new(NoCache)
        };
        Self::new(config.upstream.clone(), source, cache, config.cache.ttl())
    }

    /// Handle substituted for missing or invalid input.
    pub fn default_username(&self) -> &Username {
        &self.default_username
    }

    /// Fetch the calendar for `username`, falling back to the default handle.
    pub async fn fetch(&self, username: Option<&str>) -> Result<ContributionResult> {
        let username = Username::sanitize(username, &self.default_username);
        let url = self.upstream.url_for(&username)?;

        let page = get_or_fetch(self.cache.as_ref(), url.as_str(), self.ttl, || {
            self.source.fetch_page(&url)
        })
        .await
        .inspect_err(|e| log::warn!("Fetching contributions for {username} failed: {e}"))?;

        let parsed = parse_calendar(&page);
        if parsed.days.is_empty() {
            log::warn!("No contribution cells found for {username} at {url}");
            return Err(AppError::no_contributions(username.as_str()));
        }
        if let Some(declared) = parsed.declared_total {
            let summed = parsed.summed_total();
            if declared != summed {
                log::debug!("{username}: declared total {declared} differs from summed {summed}");
            }
        } else {
            log::debug!("{username}: no declared total, using summed day counts");
        }

        log::info!("Fetched {} contribution days for {username}", parsed.days.len());
        Ok(ContributionResult::from_parsed(username, parsed, Utc::now()))
    }
}
