//! Shared HTTP plumbing.

use crate::HttpConfig;
use chalkboard_error::{ConfigError, ProviderError, ProviderErrorKind};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, error};

/// Longest error body kept in error messages.
const MAX_ERROR_BODY: usize = 800;

/// Build the shared connection pool.
pub fn build_client(config: &HttpConfig) -> Result<Client, ConfigError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))
}

/// Map a transport failure to a provider error.
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ProviderError {
    error!(provider, error = %err, "HTTP request failed");
    if err.is_timeout() {
        ProviderError::new(ProviderErrorKind::Timeout(provider.to_string()))
    } else {
        ProviderError::new(ProviderErrorKind::Network {
            provider: provider.to_string(),
            message: err.to_string(),
        })
    }
}

/// Pass successful responses through; turn error statuses into `Api` errors.
pub(crate) async fn check_status(provider: &str, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!(provider, status = status.as_u16(), "Provider returned error status");
    Err(ProviderError::new(ProviderErrorKind::Api {
        provider: provider.to_string(),
        status: status.as_u16(),
        message: truncate(&body, MAX_ERROR_BODY),
    }))
}

/// Decode a JSON body.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, ProviderError> {
    let text = response.text().await.map_err(|e| transport_error(provider, e))?;
    serde_json::from_str(&text).map_err(|e| {
        ProviderError::new(ProviderErrorKind::ResponseParsing {
            provider: provider.to_string(),
            message: format!("{}: {}", e, truncate(&text, MAX_ERROR_BODY)),
        })
    })
}

/// GET raw bytes.
pub(crate) async fn download_bytes(
    client: &Client,
    provider: &str,
    url: &str,
) -> Result<Vec<u8>, ProviderError> {
    debug!(provider, url, "Downloading image");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_error(provider, e))?;
    let response = check_status(provider, response).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(provider, e))?;
    Ok(bytes.to_vec())
}

pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max).collect();
        cut.push_str("...");
        cut
    }
}

/// Strip a trailing slash from a base URL.
pub(crate) fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn trim_base_removes_trailing_slashes() {
        assert_eq!(trim_base("https://api.example.com/v1/"), "https://api.example.com/v1");
    }
}
