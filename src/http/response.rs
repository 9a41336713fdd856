//! Response shapes shared by the gate and the data routes.
//!
//! # Responsibilities
//! - Render rejections as `{"error": "<code>"}` with the right status
//! - Wrap upstream payloads as `{"data": ...}`
//!
//! # Design Decisions
//! - Error codes are stable strings the console UI matches on
//! - Upstream failure details are logged, never returned

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// A terminal rejection rendered as a JSON error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    /// Offending source address, only set for origin rejections.
    pub ip: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str) -> Self {
        Self { status, code, ip: None }
    }

    pub fn unauthorized(code: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code)
    }

    pub fn bad_request(code: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code)
    }

    pub fn ip_forbidden(ip: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: "ip_forbidden",
            ip: Some(ip.into()),
        }
    }

    /// Log an upstream failure and return a generic 500 with `code`.
    pub fn upstream(code: &'static str, err: &dyn std::error::Error) -> Self {
        tracing::error!(error = %err, code, "Upstream request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code,
            ip: self.ip.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Successful data route payload.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Wrap `data` as `{"data": data}`.
pub fn data<T: Serialize>(data: T) -> Json<DataEnvelope<T>> {
    Json(DataEnvelope { data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let mut stream = response.into_body().into_data_stream();
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::unauthorized("admin_unauthorized").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, serde_json::json!({"error": "admin_unauthorized"}));
    }

    #[tokio::test]
    async fn test_ip_forbidden_includes_ip() {
        let response = ApiError::ip_forbidden("10.0.0.9").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "ip_forbidden", "ip": "10.0.0.9"})
        );
    }
}
