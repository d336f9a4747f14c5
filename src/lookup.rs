//! Shared plumbing for the weather and photo lookups
//!
//! Both providers are optional decorations on a plan: a failure is reported
//! as a [`LookupError`] and the caller decides to show nothing.

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Why a lookup produced no data
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0} API key not configured")]
    MissingKey(&'static str),
    #[error("request failed: {0}")]
    Network(String),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// GET `url` with `query` and decode a JSON body into `T`.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, LookupError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| LookupError::Network(e.without_url().to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| LookupError::Network(e.without_url().to_string()))?;
    serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))
}
