// src/models/mod.rs

//! Domain models for the contribution calendar service.

pub mod config;
mod contribution;
mod username;

pub use config::{CacheConfig, CliConfig, Config, ServerConfig, UpstreamConfig};
pub use contribution::{ContributionDay, ContributionResult, MAX_LEVEL, ParsedCalendar};
pub use username::Username;
