//! Outbound REST plumbing shared by the backend, asset and payment clients.
//!
//! # Responsibilities
//! - Build `reqwest` clients with a bounded timeout
//! - Turn non-2xx responses into errors
//! - Decode JSON bodies, treating an empty body as `null`

use std::time::Duration;
use thiserror::Error;

use crate::observability::metrics;

/// Errors from calls to external REST services.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON from upstream: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client with both connect and total timeouts set to `timeout`.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, UpstreamError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()?)
}

/// Send `request` and decode the JSON response.
pub async fn send_json(
    target: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, UpstreamError> {
    let response = request.send().await.map_err(|err| {
        metrics::record_upstream(target, "error");
        UpstreamError::from(err)
    })?;
    read_json(target, response).await
}

/// Check the status and decode the body as JSON.
pub async fn read_json(
    target: &'static str,
    response: reqwest::Response,
) -> Result<serde_json::Value, UpstreamError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        metrics::record_upstream(target, "status");
        let body = String::from_utf8_lossy(&bytes).chars().take(512).collect();
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        });
    }

    metrics::record_upstream(target, "ok");
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
