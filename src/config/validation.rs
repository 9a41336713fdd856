//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Refuse production deployments without a real session secret
//! - Require a usable JWKS URL, audience and issuer while the perimeter verifier is on
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ConsoleConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{ConsoleConfig, DEV_PLACEHOLDER_SECRET};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("perimeter JWKS URL '{0}' is not an http(s) URL")]
    JwksUrl(String),

    #[error("perimeter {0} must be set while the verifier is enabled")]
    MissingPerimeterClaim(&'static str),

    #[error("ADMIN_SECRET must be set to a non-placeholder value in production")]
    SessionSecret,

    #[error("{field} '{value}' is not a valid URL")]
    Url { field: &'static str, value: String },
}

/// Validate a fully loaded configuration.
pub fn validate_config(config: &ConsoleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroDuration("timeouts.request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroDuration("timeouts.upstream_secs"));
    }
    if config.payments.poll_interval_secs == 0 {
        errors.push(ValidationError::ZeroDuration("payments.poll_interval_secs"));
    }
    if config.payments.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration("payments.timeout_secs"));
    }

    if config.perimeter_enabled() {
        let perimeter = &config.perimeter;
        if !is_http_url(&perimeter.jwks_url) {
            errors.push(ValidationError::JwksUrl(perimeter.jwks_url.clone()));
        }
        if perimeter.audience.trim().is_empty() {
            errors.push(ValidationError::MissingPerimeterClaim("audience"));
        }
        if perimeter.issuer.trim().is_empty() {
            errors.push(ValidationError::MissingPerimeterClaim("issuer"));
        }
        if perimeter.fetch_timeout_secs == 0 {
            errors.push(ValidationError::ZeroDuration("perimeter.fetch_timeout_secs"));
        }
    }

    if !config.environment.is_non_production() {
        let secret = config.admin.secret.as_deref().unwrap_or_default();
        if secret.is_empty() || secret == DEV_PLACEHOLDER_SECRET {
            errors.push(ValidationError::SessionSecret);
        }
    }

    if let Some(url) = &config.backend.url {
        if !is_http_url(url) {
            errors.push(ValidationError::Url { field: "backend.url", value: url.clone() });
        }
    }
    if !is_http_url(&config.assets.api_url) {
        errors.push(ValidationError::Url {
            field: "assets.api_url",
            value: config.assets.api_url.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
