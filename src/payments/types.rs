//! Payment service status types.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Reachability of the payment service's health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Answered 200.
    Up,
    /// Answered another 2xx.
    Degraded,
    /// Errored, timed out, or answered non-2xx.
    Down,
    /// No health URL configured.
    Unknown,
}

impl HealthStatus {
    pub fn classify(status: StatusCode) -> Self {
        if status == StatusCode::OK {
            HealthStatus::Up
        } else if status.is_success() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Down
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
}

/// One callbacks snapshot as pushed on the callbacks monitor stream.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CallbackSnapshot {
    Data { data: Value },
    Error { error: &'static str },
}
