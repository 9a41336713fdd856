//! Blob storage for static assets managed from the console.

use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use base64::Engine;

use crate::config::AssetsConfig;
use crate::upstream::{build_client, send_json, UpstreamError};

const TARGET: &str = "assets";
const FILENAME_HEADER: &str = "x-vercel-filename";

/// Body of `POST /api/assets/upload`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpload {
    pub filename: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    pub data_base64: String,
}

fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

impl AssetUpload {
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.data_base64.trim())
    }
}

pub struct BlobClient {
    http: Client,
    base: String,
    token: Option<String>,
}

impl BlobClient {
    pub fn new(config: &AssetsConfig, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: build_client(timeout)?,
            base: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, UpstreamError> {
        let token = self
            .token
            .as_deref()
            .ok_or(UpstreamError::NotConfigured("VERCEL_BLOB_TOKEN"))?;
        Ok(self
            .http
            .request(method, format!("{}{}", self.base, path))
            .bearer_auth(token))
    }

    pub async fn list(&self, prefix: &str) -> Result<Value, UpstreamError> {
        let request = self.request(Method::GET, "/list")?.query(&[("prefix", prefix)]);
        send_json(TARGET, request).await
    }

    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Value, UpstreamError> {
        let request = self
            .request(Method::POST, "/upload")?
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(FILENAME_HEADER, filename)
            .body(bytes);
        send_json(TARGET, request).await
    }

    pub async fn remove(&self, url: &str) -> Result<Value, UpstreamError> {
        let request = self
            .request(Method::DELETE, "/remove")?
            .json(&json!({ "url": url }));
        send_json(TARGET, request).await
    }
}
