use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::Value;

use super::{body, query, row_id};
use crate::backend::{summarize_accounts, AccountRow, AccountsQuery};
use crate::http::response::{data, ApiError, DataEnvelope};
use crate::http::server::AppState;

/// Accounts are the auth users page for `offset`, filtered locally by `query`.
pub async fn list_accounts(
    State(state): State<AppState>,
    params: Result<Query<AccountsQuery>, QueryRejection>,
) -> Result<Json<DataEnvelope<Vec<AccountRow>>>, ApiError> {
    let params = query(params)?;

    let users = state
        .backend
        .list_auth_users(params.page(), params.per_page())
        .await
        .map_err(|err| ApiError::upstream("accounts_query_failed", &err))?;

    Ok(data(summarize_accounts(&users, &params.query)))
}

pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let payload = body(payload)?;
    state
        .backend
        .create_account(&payload)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("account_create_failed", &err))
}

pub async fn update_account(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let id = row_id(id)?;
    let payload = body(payload)?;
    state
        .backend
        .update_account(id, &payload)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("account_update_failed", &err))
}

pub async fn delete_account(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let id = row_id(id)?;
    state
        .backend
        .delete_account(id)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("account_delete_failed", &err))
}
