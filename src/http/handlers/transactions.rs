use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::Value;

use super::query;
use crate::backend::TransactionFilter;
use crate::http::response::{data, ApiError, DataEnvelope};
use crate::http::server::AppState;

pub async fn list_transactions(
    State(state): State<AppState>,
    params: Result<Query<TransactionFilter>, QueryRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let filter = query(params)?;
    if let Err(err) = filter.account_id() {
        tracing::debug!(error = %err, "Non-numeric accountId");
        return Err(ApiError::bad_request("invalid_query"));
    }

    state
        .backend
        .get_transactions(&filter)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("transactions_query_failed", &err))
}
