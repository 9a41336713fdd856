//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{ConsoleConfig, Environment};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<ConsoleConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => ConsoleConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<ConsoleConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// Unset variables leave the current value alone. `lookup` is injected so
/// the mapping can be exercised without touching the real environment.
pub fn apply_env<F>(config: &mut ConsoleConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(env) = get("APP_ENV") {
        config.environment = Environment::from_label(&env);
    }

    if let Some(addr) = get("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    } else if let Some(port) = get("PORT") {
        config.listener.bind_address = format!("0.0.0.0:{}", port.trim());
    }

    // An explicitly empty IP_WHITELIST still means "open", so read it raw.
    if let Some(list) = lookup("IP_WHITELIST") {
        config.origin.allow_list = parse_list(&list);
    }

    if let Some(url) = get("CF_ACCESS_JWKS_URL") {
        config.perimeter.jwks_url = url;
    }
    if let Some(aud) = get("CF_ACCESS_AUD") {
        config.perimeter.audience = aud;
    }
    if let Some(iss) = get("CF_ACCESS_ISS") {
        config.perimeter.issuer = iss;
    }
    if let Some(flag) = get("CF_ACCESS_DISABLE_LOCAL") {
        config.perimeter.disable_local = flag.trim().eq_ignore_ascii_case("true");
    }

    if let Some(username) = get("ADMIN_USERNAME") {
        config.admin.username = username;
    }
    if let Some(password) = get("ADMIN_PASSWORD") {
        config.admin.password = Some(password);
    }
    if let Some(secret) = get("ADMIN_SECRET") {
        config.admin.secret = Some(secret);
    }

    if let Some(url) = get("SUPABASE_URL") {
        config.backend.url = Some(url);
    }
    if let Some(key) = get("SUPABASE_SERVICE_KEY") {
        config.backend.service_key = Some(key);
    }

    if let Some(url) = get("BLOB_API_URL") {
        config.assets.api_url = url;
    }
    if let Some(token) = get("VERCEL_BLOB_TOKEN") {
        config.assets.token = Some(token);
    }

    if let Some(url) = get("PAYMENT_HEALTH_URL") {
        config.payments.health_url = Some(url);
    }
    if let Some(url) = get("PAYMENT_CALLBACKS_URL") {
        config.payments.callbacks_url = Some(url);
    }

    if let Some(root) = get("WEB_ROOT") {
        config.web_root = Some(root);
    }
}

/// Split a comma separated list, trimming entries and dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
