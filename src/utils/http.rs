// src/utils/http.rs

//! HTTP client utilities.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::UpstreamConfig;

/// Create a configured asynchronous HTTP client for the upstream.
///
/// Every request identifies itself with the configured user agent, asks for
/// an HTML or plain-text representation and gives up after the timeout.
pub fn create_async_client(config: &UpstreamConfig) -> Result<reqwest::Client> {
    let accept = HeaderValue::from_str(&config.accept)
        .map_err(|e| AppError::config(format!("upstream.accept is not a valid header: {e}")))?;
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, accept);

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_client() {
        assert!(create_async_client(&UpstreamConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_accept_rejected() {
        let config = UpstreamConfig {
            accept: "text/html\n".to_string(),
            ..UpstreamConfig::default()
        };
        assert!(matches!(
            create_async_client(&config),
            Err(AppError::Config(_))
        ));
    }
}
