use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::Value;

use super::{body, query, row_id};
use crate::backend::AdminAccountFilter;
use crate::http::response::{data, ApiError, DataEnvelope};
use crate::http::server::AppState;

pub async fn list_admin_accounts(
    State(state): State<AppState>,
    params: Result<Query<AdminAccountFilter>, QueryRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let filter = query(params)?;
    state
        .backend
        .list_admin_accounts(&filter)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("admin_accounts_query_failed", &err))
}

pub async fn create_admin_account(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let payload = body(payload)?;
    state
        .backend
        .create_admin_account(&payload)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("admin_account_create_failed", &err))
}

pub async fn update_admin_account(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let id = row_id(id)?;
    let payload = body(payload)?;
    state
        .backend
        .update_admin_account(id, &payload)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("admin_account_update_failed", &err))
}

pub async fn delete_admin_account(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let id = row_id(id)?;
    state
        .backend
        .delete_admin_account(id)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("admin_account_delete_failed", &err))
}
