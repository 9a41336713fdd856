//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the console.
//! All types derive Serde traits for deserialization from config files; the
//! environment overlay in `loader.rs` writes into the same structs.

use serde::{Deserialize, Serialize};

/// Signing secret used when no `ADMIN_SECRET` is configured outside production.
pub const DEV_PLACEHOLDER_SECRET: &str = "change_me";

/// Default JWKS fetch timeout in seconds.
pub const DEFAULT_KEY_FETCH_TIMEOUT_SECS: u64 = 5;

/// Root configuration for the admin console.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Deployment environment. Anything not explicitly non-production is production.
    pub environment: Environment,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Network-origin allow-list.
    pub origin: OriginConfig,

    /// Zero-trust perimeter assertion verification.
    pub perimeter: PerimeterConfig,

    /// Local admin login and session signing.
    pub admin: AdminConfig,

    /// Hosted user/database backend.
    pub backend: BackendConfig,

    /// Binary asset store.
    pub assets: AssetsConfig,

    /// Payment provider feeds.
    pub payments: PaymentConfig,

    /// Directory holding the static console UI (`login.html`, `index.html`).
    pub web_root: Option<String>,
}

impl ConsoleConfig {
    /// Whether the perimeter verifier sits in the request pipeline.
    pub fn perimeter_enabled(&self) -> bool {
        !crate::security::perimeter::perimeter_bypass_allowed(
            self.perimeter.disable_local,
            self.environment.is_non_production(),
        )
    }
}

/// Deployment environment indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
    Local,
    Test,
}

impl Environment {
    /// Parse an environment label. Unrecognized labels map to production.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "local" => Environment::Local,
            "test" => Environment::Test,
            _ => Environment::Production,
        }
    }

    pub fn is_non_production(self) -> bool {
        !matches!(self, Environment::Production)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8787").
    pub bind_address: String,

    /// Largest accepted request body. Asset uploads arrive base64-encoded.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8787".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed to produce response headers, in seconds.
    pub request_secs: u64,

    /// Timeout for calls to the hosted backend and asset store, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "admin_console=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Network-origin filter configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OriginConfig {
    /// Permitted source addresses. Empty means unrestricted.
    pub allow_list: Vec<String>,
}

/// Perimeter (zero-trust gateway) assertion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PerimeterConfig {
    /// JWKS discovery URL for the gateway's signing keys.
    pub jwks_url: String,

    /// Expected `aud` claim.
    pub audience: String,

    /// Expected `iss` claim.
    pub issuer: String,

    /// Request bypass of the verifier. Honoured only outside production.
    pub disable_local: bool,

    /// Timeout for a JWKS fetch, in seconds.
    pub fetch_timeout_secs: u64,

    /// Allowed clock skew for `exp`, in seconds. Zero means `now < exp`.
    pub leeway_secs: u64,
}

impl Default for PerimeterConfig {
    fn default() -> Self {
        Self {
            jwks_url: String::new(),
            audience: String::new(),
            issuer: String::new(),
            disable_local: false,
            fetch_timeout_secs: DEFAULT_KEY_FETCH_TIMEOUT_SECS,
            leeway_secs: 0,
        }
    }
}

/// Admin login and session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Login username.
    pub username: String,

    /// Login password. Login is refused while unset.
    pub password: Option<String>,

    /// Session signing secret.
    pub secret: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: None,
            secret: None,
        }
    }
}

impl AdminConfig {
    /// Secret used to sign sessions. Falls back to the placeholder only outside production.
    pub fn session_secret(&self, environment: Environment) -> Option<&str> {
        match self.secret.as_deref() {
            Some(secret) if !secret.is_empty() => Some(secret),
            _ if environment.is_non_production() => Some(DEV_PLACEHOLDER_SECRET),
            _ => None,
        }
    }
}

/// Hosted backend (REST + auth admin API) configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BackendConfig {
    /// Project base URL; `/rest/v1` and `/auth/v1/admin` are appended.
    pub url: Option<String>,

    /// Service role key sent as `apikey` and bearer token.
    pub service_key: Option<String>,
}

/// Asset store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Blob API base URL.
    pub api_url: String,

    /// Bearer token for the blob API.
    pub token: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.blob.vercel-storage.com/v2".to_string(),
            token: None,
        }
    }
}

/// Payment provider feed configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Health probe URL. Unset reports `unknown`.
    pub health_url: Option<String>,

    /// Callback log URL. Unset reports an empty list.
    pub callbacks_url: Option<String>,

    /// Interval between monitor stream events, in seconds.
    pub poll_interval_secs: u64,

    /// Timeout for each probe, in seconds.
    pub timeout_secs: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            health_url: None,
            callbacks_url: None,
            poll_interval_secs: 5,
            timeout_secs: 5,
        }
    }
}
