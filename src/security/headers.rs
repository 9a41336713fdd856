//! Response headers for the API surface.
//!
//! # Responsibilities
//! - Mark every `/api` response uncacheable (`Cache-Control: no-store`, `Pragma: no-cache`)
//! - Provide the CORS policy for the console UI
//!
//! # Design Decisions
//! - Static UI files stay cacheable; only `/api` is touched
//! - Preflight requests are answered by the CORS layer before the gate runs

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tower_http::cors::CorsLayer;

pub async fn api_cache_headers(request: Request<Body>, next: Next) -> Response {
    let is_api = request.uri().path().starts_with("/api");
    let mut response = next.run(request).await;
    if is_api {
        let headers = response.headers_mut();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    }
    response
}

/// Any origin, any method, any header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
