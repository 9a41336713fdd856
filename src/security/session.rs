//! First-party admin sessions.
//!
//! # States
//! ```text
//! no-session → pending-login → issued (valid until iat + 2h) → expired
//! ```
//!
//! Tokens are HS256 JWTs signed with the server secret and carried in the
//! `admin_session` cookie. Nothing is stored server-side: a token stays valid
//! until its `exp` even if the configured credentials change.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "admin_session";

/// Fixed session lifetime: two hours.
pub const SESSION_TTL_SECS: i64 = 2 * 60 * 60;

/// Decoded payload of a valid session, attached to gated requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    /// Admin username.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to sign session: {0}")]
    Sign(jsonwebtoken::errors::Error),

    #[error("invalid session: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Signs and verifies session tokens with one server secret.
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionSigner {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // jsonwebtoken accepts `exp == now`; sessions end at `exp`.
        validation.reject_tokens_expiring_in_less_than = 1;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Mint a token for `username`, valid for two hours from now.
    pub fn issue(&self, username: &str) -> Result<String, SessionError> {
        self.issue_at(username, Utc::now().timestamp())
    }

    /// Mint a token as if issued at `issued_at` (unix seconds).
    pub fn issue_at(&self, username: &str, issued_at: i64) -> Result<String, SessionError> {
        let identity = AdminIdentity {
            sub: username.to_string(),
            iat: issued_at,
            exp: issued_at + SESSION_TTL_SECS,
        };
        encode(&Header::new(Algorithm::HS256), &identity, &self.encoding).map_err(SessionError::Sign)
    }

    /// Check signature and expiry (`now < exp`, no leeway).
    pub fn verify(&self, token: &str) -> Result<AdminIdentity, SessionError> {
        decode::<AdminIdentity>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(SessionError::Invalid)
    }
}

/// Plaintext credentials for the basic login path.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password: Option<String>,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Exact string comparison. Always false while no password is configured.
    // TODO: rate-limit failed attempts per client address before exposing beyond the perimeter.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        match &self.password {
            Some(expected) => username == self.username && password == expected,
            None => false,
        }
    }
}

/// `Set-Cookie` value for a freshly issued token.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        urlencoding::encode(token)
    )
}

/// Parse a `Cookie` header: split on `;`, then on the first `=`, percent-decoding values.
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let value = urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string());
            Some((name.trim().to_string(), value))
        })
        .collect()
}
