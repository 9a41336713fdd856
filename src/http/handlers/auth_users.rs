use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Serialize;
use serde_json::Value;

use super::{body, query};
use crate::backend::{AuthUsersQuery, NewAuthUser};
use crate::http::response::{data, ApiError, DataEnvelope};
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct Deleted {
    pub ok: bool,
}

pub async fn list_auth_users(
    State(state): State<AppState>,
    params: Result<Query<AuthUsersQuery>, QueryRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let params = query(params)?;
    state
        .backend
        .list_auth_users(params.page, params.per_page)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("auth_users_query_failed", &err))
}

pub async fn create_auth_user(
    State(state): State<AppState>,
    payload: Result<Json<NewAuthUser>, JsonRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let user = body(payload)?;
    state
        .backend
        .create_auth_user(&user)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("auth_user_create_failed", &err))
}

/// Partial updates are forwarded as the auth API's full `PUT`.
pub async fn update_auth_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let patch = body(payload)?;
    state
        .backend
        .update_auth_user(&id, &patch)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("auth_user_update_failed", &err))
}

pub async fn delete_auth_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    state
        .backend
        .delete_auth_user(&id)
        .await
        .map_err(|err| ApiError::upstream("auth_user_delete_failed", &err))?;
    Ok(Json(Deleted { ok: true }))
}
