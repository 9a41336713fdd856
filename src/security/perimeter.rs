//! Perimeter identity verification.
//!
//! Second stage of the gate. The zero-trust access gateway in front of the
//! console signs an RS256 assertion for every request it lets through; this
//! module checks it against the gateway's published key set.
//!
//! # Security model
//! - Only RS256 is accepted; the algorithm comes from configuration, never the token.
//! - `aud`, `iss` and `exp` are required and checked.
//! - Every verification failure yields the same 401 body. The reason is logged
//!   at debug level only, so probing clients learn nothing about which check failed.
//! - The decoded claims are attached as [`PerimeterClaims`], a type separate
//!   from the admin session identity.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::config::PerimeterConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::security::jwks::{KeySetError, SigningKeyCache};

/// Header carrying the gateway assertion.
pub const ASSERTION_HEADER: &str = "cf-access-jwt-assertion";

/// The verifier may be bypassed only when asked to and outside production.
pub fn perimeter_bypass_allowed(disable_local_flag: bool, is_non_production: bool) -> bool {
    disable_local_flag && is_non_production
}

/// Claims of a verified perimeter assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerimeterClaims {
    pub iss: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Remaining claims, including `aud`.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum PerimeterError {
    #[error("malformed assertion header: {0}")]
    MalformedHeader(jsonwebtoken::errors::Error),

    #[error("unsupported algorithm {0:?}")]
    UnsupportedAlgorithm(Algorithm),

    #[error("assertion has no key id")]
    MissingKeyId,

    #[error(transparent)]
    KeyResolution(#[from] KeySetError),

    #[error("assertion rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Verifies gateway assertions against a cached signing key set.
pub struct PerimeterVerifier {
    keys: SigningKeyCache,
    validation: Validation,
}

impl PerimeterVerifier {
    pub fn new(keys: SigningKeyCache, audience: &str, issuer: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.leeway = leeway_secs;
        validation.reject_tokens_expiring_in_less_than = 1;
        Self { keys, validation }
    }

    pub fn from_config(keys: SigningKeyCache, config: &PerimeterConfig) -> Self {
        Self::new(keys, &config.audience, &config.issuer, config.leeway_secs)
    }

    /// Verify an assertion and return its claims.
    pub async fn verify(&self, token: &str) -> Result<PerimeterClaims, PerimeterError> {
        // The header is read unverified only to pick the key.
        let header = decode_header(token).map_err(PerimeterError::MalformedHeader)?;
        if header.alg != Algorithm::RS256 {
            return Err(PerimeterError::UnsupportedAlgorithm(header.alg));
        }
        let kid = header.kid.as_deref().ok_or(PerimeterError::MissingKeyId)?;

        let key = self.keys.resolve(kid).await?;
        let data = decode::<PerimeterClaims>(token, &key, &self.validation)?;
        Ok(data.claims)
    }
}

pub async fn perimeter_middleware(
    State(verifier): State<Arc<PerimeterVerifier>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match request.headers().get(ASSERTION_HEADER) {
        None => return reject("access_jwt_missing"),
        Some(value) => match value.to_str() {
            Ok(token) if !token.trim().is_empty() => token.trim().to_string(),
            Ok(_) => return reject("access_jwt_missing"),
            Err(_) => return reject("access_verification_failed"),
        },
    };

    match verifier.verify(&token).await {
        Ok(claims) => {
            tracing::debug!(sub = ?claims.sub, email = ?claims.email, "Perimeter assertion accepted");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "Perimeter assertion rejected");
            reject("access_jwt_invalid")
        }
    }
}

fn reject(code: &'static str) -> Response {
    metrics::record_gate_rejection("perimeter", code);
    ApiError::unauthorized(code).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::jwks::KeySource;
    use async_trait::async_trait;
    use jsonwebtoken::jwk::JwkSet;
    use jsonwebtoken::{encode, EncodingKey, Header};

    struct EmptySource;

    #[async_trait]
    impl KeySource for EmptySource {
        async fn fetch(&self) -> Result<JwkSet, KeySetError> {
            Ok(JwkSet { keys: Vec::new() })
        }
    }

    fn verifier() -> PerimeterVerifier {
        PerimeterVerifier::new(SigningKeyCache::new(Arc::new(EmptySource)), "aud", "https://iss.example", 0)
    }

    #[test]
    fn test_bypass_requires_both_flags() {
        assert!(perimeter_bypass_allowed(true, true));
        assert!(!perimeter_bypass_allowed(true, false));
        assert!(!perimeter_bypass_allowed(false, true));
        assert!(!perimeter_bypass_allowed(false, false));
    }

    #[tokio::test]
    async fn test_rejects_garbage() {
        let err = verifier().verify("not-a-jwt").await.err().unwrap();
        assert!(matches!(err, PerimeterError::MalformedHeader(_)));
    }

    #[tokio::test]
    async fn test_rejects_symmetric_algorithm() {
        let claims = serde_json::json!({ "iss": "https://iss.example", "aud": "aud", "exp": 4_000_000_000i64 });
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"guess")).unwrap();
        let err = verifier().verify(&token).await.err().unwrap();
        assert!(matches!(err, PerimeterError::UnsupportedAlgorithm(Algorithm::HS256)));
    }

    #[tokio::test]
    async fn test_unknown_kid_is_key_resolution_error() {
        // Signature bytes are never checked: resolution fails first.
        let header = r#"{"alg":"RS256","typ":"JWT","kid":"nope"}"#;
        let encoded = base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, header);
        let token = format!("{encoded}.e30.c2ln");
        let err = verifier().verify(&token).await.err().unwrap();
        assert!(matches!(err, PerimeterError::KeyResolution(KeySetError::UnknownKeyId(_))));
    }

    #[tokio::test]
    async fn test_missing_kid() {
        let header = r#"{"alg":"RS256","typ":"JWT"}"#;
        let encoded = base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, header);
        let token = format!("{encoded}.e30.c2ln");
        let err = verifier().verify(&token).await.err().unwrap();
        assert!(matches!(err, PerimeterError::MissingKeyId));
    }
}
