use axum::{
    body::Body,
    extract::State,
    http::{header::COOKIE, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::security::session::{parse_cookies, SessionSigner, SESSION_COOKIE};

/// Session token from the request's `Cookie` header(s), if any.
pub fn session_token(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|raw| parse_cookies(raw).remove(SESSION_COOKIE))
}

pub async fn admin_auth_middleware(
    State(sessions): State<Arc<SessionSigner>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = session_token(&request) else {
        metrics::record_gate_rejection("session", "admin_unauthorized");
        return ApiError::unauthorized("admin_unauthorized").into_response();
    };

    match sessions.verify(&token) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "Admin session rejected");
            metrics::record_gate_rejection("session", "admin_session_invalid");
            ApiError::unauthorized("admin_session_invalid").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_across_cookie_headers() {
        let request = Request::builder()
            .header(COOKIE, "theme=dark")
            .header(COOKIE, "admin_session=abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(session_token(&request).as_deref(), Some("abc"));
    }

    #[test]
    fn test_no_session_cookie() {
        let request = Request::builder()
            .header(COOKIE, "theme=dark")
            .body(Body::empty())
            .unwrap();
        assert!(session_token(&request).is_none());
    }
}
