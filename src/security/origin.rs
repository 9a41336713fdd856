//! Network-origin filter.
//!
//! First stage of the gate: the client's source address must be on the
//! configured allow-list. An empty list leaves the console open.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::http::response::ApiError;
use crate::observability::metrics;

/// Header set by the trusted edge proxy with the original client address.
pub const CLIENT_IP_HEADER: &str = "cf-connecting-ip";

/// Immutable set of permitted source addresses.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    addrs: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addrs = addrs
            .into_iter()
            .map(|addr| addr.as_ref().trim().to_string())
            .filter(|addr| !addr.is_empty())
            .collect();
        Self { addrs }
    }

    /// True when no restriction applies.
    pub fn is_open(&self) -> bool {
        self.addrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Pass/reject decision for an already normalized address.
    pub fn permits(&self, addr: &str) -> bool {
        self.is_open() || self.addrs.contains(addr)
    }
}

/// Strip the IPv4-mapped IPv6 prefix (`::ffff:1.2.3.4` → `1.2.3.4`).
pub fn normalize_ip(raw: &str) -> String {
    let raw = raw.trim();
    raw.strip_prefix("::ffff:").unwrap_or(raw).to_string()
}

/// Resolve the client address, preferring the proxy header over the socket peer.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(CLIENT_IP_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match (forwarded, peer) {
        (Some(value), _) => normalize_ip(value),
        (None, Some(peer)) => normalize_ip(&peer.ip().to_string()),
        (None, None) => String::new(),
    }
}

pub async fn origin_filter_middleware(
    State(allow_list): State<Arc<AllowList>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if allow_list.is_open() {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = resolve_client_ip(request.headers(), peer);

    if allow_list.permits(&ip) {
        return next.run(request).await;
    }

    tracing::warn!(ip = %ip, path = %request.uri().path(), "Source address not on allow-list");
    metrics::record_gate_rejection("origin", "ip_forbidden");
    ApiError::ip_forbidden(ip).into_response()
}
