// src/error.rs

//! Unified error handling for the contribution calendar service.

use std::fmt;

use thiserror::Error;

/// Result type alias for contribution calendar operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream answered with a non-success status
    #[error("Upstream {url} returned status {status}")]
    UpstreamStatus { url: String, status: u16 },

    /// Upstream page was reachable but held no calendar cells
    #[error("No contribution days found for {username}")]
    NoContributions { username: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an upstream status error.
    pub fn upstream_status(url: impl fmt::Display, status: u16) -> Self {
        Self::UpstreamStatus {
            url: url.to_string(),
            status,
        }
    }

    /// Create a not-found error for a user without calendar data.
    pub fn no_contributions(username: impl Into<String>) -> Self {
        Self::NoContributions {
            username: username.into(),
        }
    }

    /// HTTP status class this error surfaces as.
    ///
    /// Upstream failures map to 502 and empty calendars to 404. Everything
    /// else (transport, decoding, internal) is a 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UpstreamStatus { .. } => 502,
            Self::NoContributions { .. } => 404,
            _ => 500,
        }
    }

    /// Fixed message returned to HTTP clients. Never carries internal detail.
    pub fn public_message(&self) -> &'static str {
        match self.status_code() {
            502 => "Unable to fetch GitHub contribution data.",
            404 => "No contribution data found for this user.",
            _ => "Could not load contribution data right now.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_is_bad_gateway() {
        let err = AppError::upstream_status("https://github.com/users/x/contributions", 503);
        assert_eq!(err.status_code(), 502);
        assert_eq!(
            err.public_message(),
            "Unable to fetch GitHub contribution data."
        );
    }

    #[test]
    fn test_no_contributions_is_not_found() {
        let err = AppError::no_contributions("octocat");
        assert_eq!(err.status_code(), 404);
        assert_eq!(
            err.public_message(),
            "No contribution data found for this user."
        );
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err = AppError::config("broken");
        assert_eq!(err.status_code(), 500);
        assert_eq!(
            err.public_message(),
            "Could not load contribution data right now."
        );

        let io = AppError::from(std::io::Error::other("socket closed"));
        assert_eq!(io.status_code(), 500);
    }

    #[test]
    fn test_display_keeps_detail() {
        let err = AppError::upstream_status("https://example.com", 429);
        assert_eq!(err.to_string(), "Upstream https://example.com returned status 429");
    }
}
