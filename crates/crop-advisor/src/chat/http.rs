//! Blocking HTTP plumbing shared by the chat providers.

use super::ChatConfig;
use crate::error::{AdvisorError, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;

/// Check the key and build a client with the configured timeout.
pub(super) fn client(provider: &str, api_key: &str, config: &ChatConfig) -> Result<Client> {
    if api_key.trim().is_empty() {
        return Err(AdvisorError::InvalidConfig(format!("{} API key is empty", provider)));
    }

    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AdvisorError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))
}

/// Send `request`, turning transport failures and error statuses into
/// [`AdvisorError::UpstreamUnavailable`].
pub(super) fn send(provider: &str, request: RequestBuilder) -> Result<Response> {
    let response = request.send().map_err(|e| upstream(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(AdvisorError::UpstreamUnavailable(format!(
            "{} API error {}: {}",
            provider, status, body
        )));
    }
    Ok(response)
}

pub(super) fn upstream(provider: &str, e: reqwest::Error) -> AdvisorError {
    if e.is_timeout() {
        AdvisorError::UpstreamUnavailable(format!("{} request timed out", provider))
    } else {
        AdvisorError::UpstreamUnavailable(format!("{} request failed: {}", provider, e))
    }
}
