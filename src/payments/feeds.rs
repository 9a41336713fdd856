//! Probes against the payment service.
//!
//! Both URLs are optional. An unset health URL reports `unknown`; an unset
//! callbacks URL reports an empty list.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::types::{CallbackSnapshot, HealthStatus};
use crate::config::PaymentConfig;
use crate::observability::metrics;
use crate::upstream::{build_client, send_json, UpstreamError};

const TARGET: &str = "payments";

pub struct PaymentFeeds {
    http: Client,
    health_url: Option<String>,
    callbacks_url: Option<String>,
    poll_interval: Duration,
}

impl PaymentFeeds {
    pub fn new(config: &PaymentConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: build_client(Duration::from_secs(config.timeout_secs))?,
            health_url: config.health_url.clone(),
            callbacks_url: config.callbacks_url.clone(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
        })
    }

    /// Period between monitor stream events.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Probe the health URL once. Never fails; failures report `down`.
    pub async fn health(&self) -> HealthStatus {
        let Some(url) = self.health_url.as_deref() else {
            return HealthStatus::Unknown;
        };

        match self.http.get(url).send().await {
            Ok(response) => {
                let status = HealthStatus::classify(response.status());
                metrics::record_upstream(TARGET, if status == HealthStatus::Down { "status" } else { "ok" });
                status
            }
            Err(err) => {
                tracing::warn!(error = %err, "Payment health probe failed");
                metrics::record_upstream(TARGET, "error");
                HealthStatus::Down
            }
        }
    }

    /// Fetch the callbacks payload as-is.
    pub async fn callbacks(&self) -> Result<Value, UpstreamError> {
        match self.callbacks_url.as_deref() {
            Some(url) => send_json(TARGET, self.http.get(url)).await,
            None => Ok(Value::Array(Vec::new())),
        }
    }

    pub async fn callbacks_snapshot(&self) -> CallbackSnapshot {
        match self.callbacks().await {
            Ok(data) => CallbackSnapshot::Data { data },
            Err(err) => {
                tracing::warn!(error = %err, "Payment callbacks fetch failed");
                CallbackSnapshot::Error { error: "down" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feeds(health_url: Option<&str>, callbacks_url: Option<&str>) -> PaymentFeeds {
        PaymentFeeds::new(&PaymentConfig {
            health_url: health_url.map(str::to_string),
            callbacks_url: callbacks_url.map(str::to_string),
            poll_interval_secs: 5,
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_feeds() {
        let feeds = feeds(None, None);
        assert_eq!(feeds.health().await, HealthStatus::Unknown);
        assert_eq!(feeds.callbacks().await.unwrap(), Value::Array(vec![]));
        assert_eq!(feeds.poll_interval(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_down() {
        // Port 9 on loopback refuses connections.
        let feeds = feeds(Some("http://127.0.0.1:9/health"), Some("http://127.0.0.1:9/cb"));
        assert_eq!(feeds.health().await, HealthStatus::Down);
        assert!(matches!(
            feeds.callbacks_snapshot().await,
            CallbackSnapshot::Error { error: "down" }
        ));
    }
}
