//! Service layer for the contribution calendar.
//!
//! - Markup parsing (`parser`)
//! - Page caching (`cache`)
//! - Upstream fetching (`ContributionFetcher`)

pub mod cache;
mod fetcher;
pub mod parser;

pub use cache::{MemoryCache, NoCache, PageCache};
pub use fetcher::{ContributionFetcher, HttpPageSource, PageSource};

#[cfg(test)]
pub(crate) use fetcher::testing;
