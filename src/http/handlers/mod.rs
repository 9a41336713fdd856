//! Data route handlers.
//!
//! Each handler validates its input, calls one upstream client and wraps
//! the payload as `{"data": ...}`. Upstream failures map to a per-route
//! error code; details only reach the log.

pub mod accounts;
pub mod admin_accounts;
pub mod assets;
pub mod auth_users;
pub mod payments;
pub mod transactions;
pub mod ui;

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Json, Path, Query,
};

use crate::http::response::ApiError;

pub(crate) fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected query string");
        ApiError::bad_request("invalid_query")
    })
}

pub(crate) fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::bad_request("invalid_request")
    })
}

pub(crate) fn row_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::bad_request("invalid_id"))
}
