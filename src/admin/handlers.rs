use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::session::{session_cookie, AdminIdentity};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// The login page posts `email`; API clients post `username`.
    #[serde(default, alias = "email")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: AdminIdentity,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Malformed login body");
        ApiError::bad_request("invalid_request")
    })?;

    if !state.credentials.matches(&request.username, &request.password) {
        tracing::warn!(username = %request.username, "Admin login failed");
        metrics::record_login("rejected");
        return Err(ApiError::unauthorized("invalid_credentials"));
    }

    let token = state.sessions.issue(&request.username).map_err(|err| {
        tracing::error!(error = %err, "Failed to issue admin session");
        ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, "session_issue_failed")
    })?;

    tracing::info!(username = %request.username, "Admin session issued");
    metrics::record_login("ok");
    Ok((
        [(SET_COOKIE, session_cookie(&token))],
        Json(LoginResponse { ok: true }),
    )
        .into_response())
}

pub async fn me(Extension(identity): Extension<AdminIdentity>) -> Json<MeResponse> {
    Json(MeResponse { user: identity })
}
