//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the gate (allow-list, perimeter verifier, session signer)
//! - Build the outbound clients
//! - Assemble the shared `AppState`
//!
//! Configuration must already be validated.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::assets::BlobClient;
use crate::backend::BackendClient;
use crate::config::ConsoleConfig;
use crate::http::server::AppState;
use crate::lifecycle::Shutdown;
use crate::payments::PaymentFeeds;
use crate::security::{
    AdminCredentials, AllowList, HttpKeySource, KeySetError, KeySource, PerimeterVerifier,
    SessionSigner, SigningKeyCache,
};
use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no session secret configured for {0:?}")]
    MissingSessionSecret(crate::config::Environment),

    #[error("key source: {0}")]
    KeySource(#[from] KeySetError),

    #[error("upstream client: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Build state with the HTTP key source named by `perimeter.jwks_url`.
pub fn build_state(config: ConsoleConfig) -> Result<AppState, StartupError> {
    let source = HttpKeySource::new(
        config.perimeter.jwks_url.clone(),
        Duration::from_secs(config.perimeter.fetch_timeout_secs),
    )?;
    build_state_with_key_source(config, Arc::new(source))
}

pub fn build_state_with_key_source(
    config: ConsoleConfig,
    keys: Arc<dyn KeySource>,
) -> Result<AppState, StartupError> {
    let environment = config.environment;

    let perimeter = if config.perimeter_enabled() {
        tracing::info!(
            jwks_url = %config.perimeter.jwks_url,
            audience = %config.perimeter.audience,
            "Perimeter verifier enabled"
        );
        Some(Arc::new(PerimeterVerifier::from_config(
            SigningKeyCache::new(keys),
            &config.perimeter,
        )))
    } else {
        tracing::warn!(environment = ?environment, "Perimeter verifier bypassed");
        None
    };

    let secret = config
        .admin
        .session_secret(environment)
        .ok_or(StartupError::MissingSessionSecret(environment))?;
    if config.admin.secret.as_deref().map_or(true, str::is_empty) {
        tracing::warn!("Signing admin sessions with the development placeholder secret");
    }
    let sessions = Arc::new(SessionSigner::new(secret));

    let allow_list = Arc::new(AllowList::new(&config.origin.allow_list));
    if allow_list.is_open() {
        tracing::warn!("Origin allow-list is empty; all source addresses admitted");
    } else {
        tracing::info!(entries = allow_list.len(), "Origin allow-list loaded");
    }

    let upstream_timeout = Duration::from_secs(config.timeouts.upstream_secs);
    let backend = BackendClient::new(&config.backend, upstream_timeout)?;
    if !backend.is_configured() {
        tracing::warn!("Hosted backend URL not set; data routes will fail");
    }

    Ok(AppState {
        allow_list,
        perimeter,
        sessions,
        credentials: Arc::new(AdminCredentials::new(
            config.admin.username.clone(),
            config.admin.password.clone(),
        )),
        backend: Arc::new(backend),
        assets: Arc::new(BlobClient::new(&config.assets, upstream_timeout)?),
        payments: Arc::new(PaymentFeeds::new(&config.payments)?),
        shutdown: Arc::new(Shutdown::new()),
        config: Arc::new(config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn test_production_without_secret_fails() {
        let config = ConsoleConfig::default();
        assert_eq!(config.environment, Environment::Production);

        let err = build_state(config).err().unwrap();
        assert!(matches!(err, StartupError::MissingSessionSecret(Environment::Production)));
    }

    #[test]
    fn test_local_bypass_skips_perimeter() {
        let mut config = ConsoleConfig::default();
        config.environment = Environment::Local;
        config.perimeter.disable_local = true;

        let state = build_state(config).unwrap();
        assert!(state.perimeter.is_none());
        assert!(state.allow_list.is_open());
    }

    #[test]
    fn test_production_keeps_perimeter_despite_flag() {
        let mut config = ConsoleConfig::default();
        config.perimeter.disable_local = true;
        config.admin.secret = Some("s3cret".into());

        let state = build_state(config).unwrap();
        assert!(state.perimeter.is_some());
    }
}
