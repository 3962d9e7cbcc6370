// src/services/cache.rs

//! Read-through cache for upstream pages.
//!
//! The fetcher never talks to a concrete cache; it goes through
//! [`get_or_fetch`] with whatever [`PageCache`] it was built with. Entries are
//! keyed by the upstream URL. Two cold requests for the same key may both hit
//! the loader; both store the same page.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;

/// Storage for fetched pages with a per-entry time to live.
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Return a fresh page for `key`, if any.
    async fn lookup(&self, key: &str) -> Option<String>;

    /// Store `page` under `key` for `ttl`.
    async fn store(&self, key: &str, page: String, ttl: Duration);
}

/// Return the cached page for `key`, or run `loader` once and cache its
/// successful result. Loader errors pass through and are not cached.
pub async fn get_or_fetch<F, Fut>(
    cache: &dyn PageCache,
    key: &str,
    ttl: Duration,
    loader: F,
) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    if let Some(page) = cache.lookup(key).await {
        log::debug!("Cache hit for {key}");
        return Ok(page);
    }

    log::debug!("Cache miss for {key}");
    let page = loader().await?;
    cache.store(key, page.clone(), ttl).await;
    Ok(page)
}

#[derive(Debug, Clone)]
struct CachedPage {
    page: String,
    /// `None` when the ttl reaches past what an `Instant` can hold.
    expires_at: Option<Instant>,
}

impl CachedPage {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// In-process cache shared by all requests of one server.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedPage>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PageCache for MemoryCache {
    async fn lookup(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(Instant::now()))
            .map(|entry| entry.page.clone())
    }

    async fn store(&self, key: &str, page: String, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_fresh(now));
        entries.insert(
            key.to_string(),
            CachedPage {
                page,
                expires_at: now.checked_add(ttl),
            },
        );
    }
}

/// Cache that never holds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

#[async_trait]
impl PageCache for NoCache {
    async fn lookup(&self, _key: &str) -> Option<String> {
        None
    }

    async fn store(&self, _key: &str, _page: String, _ttl: Duration) {}
}
