use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{body, query};
use crate::assets::AssetUpload;
use crate::http::response::{data, ApiError, DataEnvelope};
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveParams {
    #[serde(default)]
    pub url: String,
}

pub async fn list_assets(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let params = query(params)?;
    state
        .assets
        .list(&params.prefix)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("assets_list_failed", &err))
}

pub async fn upload_asset(
    State(state): State<AppState>,
    payload: Result<Json<AssetUpload>, JsonRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let upload = body(payload)?;
    let bytes = upload.decode().map_err(|err| {
        tracing::debug!(error = %err, filename = %upload.filename, "Undecodable asset payload");
        ApiError::bad_request("invalid_asset_payload")
    })?;

    tracing::info!(filename = %upload.filename, size = bytes.len(), "Uploading asset");
    state
        .assets
        .upload(&upload.filename, &upload.content_type, bytes)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("assets_upload_failed", &err))
}

pub async fn remove_asset(
    State(state): State<AppState>,
    params: Result<Query<RemoveParams>, QueryRejection>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    let params = query(params)?;
    state
        .assets
        .remove(&params.url)
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("assets_remove_failed", &err))
}
