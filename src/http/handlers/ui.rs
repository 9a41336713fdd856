//! Console UI entry point.

use axum::{
    body::Body,
    extract::State,
    http::{header::COOKIE, Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::http::server::AppState;
use crate::security::session::SESSION_COOKIE;

/// Page served at `/`: the login page until a session cookie is present.
///
/// Only the cookie's presence is checked; the data routes verify it.
pub fn landing_page(request: &Request<Body>) -> &'static str {
    let marker = format!("{SESSION_COOKIE}=");
    let has_session = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|raw| raw.contains(&marker));

    if has_session {
        "index.html"
    } else {
        "login.html"
    }
}

pub async fn console_index(State(state): State<AppState>, request: Request<Body>) -> Response {
    let Some(root) = state.config.web_root.as_deref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let page = Path::new(root).join(landing_page(&request));
    match ServeFile::new(page).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_page_follows_cookie() {
        let anonymous = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(landing_page(&anonymous), "login.html");

        let signed_in = Request::builder()
            .header(COOKIE, "theme=dark; admin_session=abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(landing_page(&signed_in), "index.html");
    }
}
