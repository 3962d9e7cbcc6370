// src/lib.rs

//! Contribution calendar library: fetch, parse and lay out a user's
//! public contribution heatmap.

pub mod calendar;
pub mod error;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod utils;
