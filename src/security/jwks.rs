//! Signing key set for perimeter assertions.
//!
//! # Cache Behavior
//! - Keys are fetched lazily, on the first assertion that names an unknown `kid`.
//! - A miss fetches the full JWKS from the source and inserts every RSA key.
//! - No TTL: a cached `kid` is served from memory for the process lifetime.
//!
//! # Concurrency model
//! `DashMap` shared across requests. Concurrent misses for the same `kid`
//! each fetch and insert; writes are idempotent (same kid, same key material)
//! and last writer wins. No map guard is held across an `.await`.
//!
//! A stale or wrong key only ever makes verification fail, never succeed.

use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::jwk::{AlgorithmParameters, JwkSet};
use jsonwebtoken::DecodingKey;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::observability::metrics;

/// Errors raised while resolving a signing key.
#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("key set fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("key set endpoint returned status {0}")]
    Status(u16),

    #[error("key id '{0}' not present in key set")]
    UnknownKeyId(String),
}

/// Where the key set comes from. Swapped out in tests.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, KeySetError>;
}

/// Fetches the JWKS document over HTTP with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    client: reqwest::Client,
    url: String,
}

impl HttpKeySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, KeySetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch(&self) -> Result<JwkSet, KeySetError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(KeySetError::Status(status.as_u16()));
        }
        Ok(response.json::<JwkSet>().await?)
    }
}

/// In-memory `kid → key` cache with read-through on miss.
pub struct SigningKeyCache {
    source: Arc<dyn KeySource>,
    keys: DashMap<String, DecodingKey>,
}

impl SigningKeyCache {
    pub fn new(source: Arc<dyn KeySource>) -> Self {
        Self {
            source,
            keys: DashMap::new(),
        }
    }

    /// Cached key for `kid`, without fetching.
    pub fn cached(&self, kid: &str) -> Option<DecodingKey> {
        self.keys.get(kid).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Resolve `kid`, fetching the key set once on a miss.
    pub async fn resolve(&self, kid: &str) -> Result<DecodingKey, KeySetError> {
        if let Some(key) = self.cached(kid) {
            return Ok(key);
        }

        self.refresh().await?;
        self.cached(kid)
            .ok_or_else(|| KeySetError::UnknownKeyId(kid.to_string()))
    }

    /// Fetch the full key set and insert every usable RSA key. Returns the count inserted.
    pub async fn refresh(&self) -> Result<usize, KeySetError> {
        let jwks = match self.source.fetch().await {
            Ok(jwks) => {
                metrics::record_jwks_fetch("ok");
                jwks
            }
            Err(err) => {
                metrics::record_jwks_fetch("error");
                tracing::warn!(error = %err, "Signing key set fetch failed");
                return Err(err);
            }
        };

        let mut inserted = 0;
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.as_deref() else {
                continue;
            };
            if !matches!(jwk.algorithm, AlgorithmParameters::RSA(_)) {
                tracing::debug!(kid, "Skipping non-RSA signing key");
                continue;
            }
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    self.keys.insert(kid.to_string(), key);
                    inserted += 1;
                }
                Err(err) => tracing::warn!(kid, error = %err, "Ignoring malformed signing key"),
            }
        }

        tracing::info!(inserted, cached = self.keys.len(), "Signing key set refreshed");
        Ok(inserted)
    }
}
