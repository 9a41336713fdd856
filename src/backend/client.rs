//! Hosted Postgres backend client.
//!
//! Two surfaces share the service key: the PostgREST API under
//! `/rest/v1` and the auth admin API under `/auth/v1/admin`. Both send
//! the key as `apikey` and as a bearer token.

use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use super::types::{AdminAccountFilter, NewAuthUser, TransactionFilter};
use crate::config::BackendConfig;
use crate::upstream::{build_client, send_json, UpstreamError};

const TARGET: &str = "backend";

#[derive(Debug, Clone)]
struct Endpoint {
    base: String,
    key: String,
}

pub struct BackendClient {
    http: Client,
    endpoint: Option<Endpoint>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig, timeout: Duration) -> Result<Self, UpstreamError> {
        let endpoint = config.url.as_deref().map(|url| Endpoint {
            base: url.trim_end_matches('/').to_string(),
            key: config.service_key.clone().unwrap_or_default(),
        });

        Ok(Self {
            http: build_client(timeout)?,
            endpoint,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, UpstreamError> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or(UpstreamError::NotConfigured("SUPABASE_URL"))?;

        Ok(self
            .http
            .request(method, format!("{}{}", endpoint.base, path))
            .header("apikey", &endpoint.key)
            .bearer_auth(&endpoint.key))
    }

    fn rest(&self, method: Method, path: &str) -> Result<RequestBuilder, UpstreamError> {
        Ok(self
            .request(method, &format!("/rest/v1{path}"))?
            .header("Prefer", "return=representation"))
    }

    fn auth(&self, method: Method, path: &str) -> Result<RequestBuilder, UpstreamError> {
        self.request(method, &format!("/auth/v1/admin{path}"))
    }

    // Auth admin users

    pub async fn list_auth_users(&self, page: u32, per_page: u32) -> Result<Value, UpstreamError> {
        let request = self
            .auth(Method::GET, "/users")?
            .query(&[("page", page), ("per_page", per_page)]);
        send_json(TARGET, request).await
    }

    pub async fn create_auth_user(&self, user: &NewAuthUser) -> Result<Value, UpstreamError> {
        send_json(TARGET, self.auth(Method::POST, "/users")?.json(user)).await
    }

    pub async fn update_auth_user(&self, id: &str, patch: &Value) -> Result<Value, UpstreamError> {
        let path = format!("/users/{}", urlencoding::encode(id));
        send_json(TARGET, self.auth(Method::PUT, &path)?.json(patch)).await
    }

    pub async fn delete_auth_user(&self, id: &str) -> Result<Value, UpstreamError> {
        let path = format!("/users/{}", urlencoding::encode(id));
        send_json(TARGET, self.auth(Method::DELETE, &path)?).await
    }

    // Rest tables

    pub async fn get_transactions(&self, filter: &TransactionFilter) -> Result<Value, UpstreamError> {
        let request = self
            .rest(Method::GET, "/transactions")?
            .query(&filter.to_query());
        send_json(TARGET, request).await
    }

    pub async fn create_account(&self, body: &Value) -> Result<Value, UpstreamError> {
        send_json(TARGET, self.rest(Method::POST, "/accounts")?.json(body)).await
    }

    pub async fn update_account(&self, id: i64, patch: &Value) -> Result<Value, UpstreamError> {
        let path = format!("/accounts?id=eq.{id}");
        send_json(TARGET, self.rest(Method::PATCH, &path)?.json(patch)).await
    }

    pub async fn delete_account(&self, id: i64) -> Result<Value, UpstreamError> {
        send_json(TARGET, self.rest(Method::DELETE, &format!("/accounts?id=eq.{id}"))?).await
    }

    pub async fn list_admin_accounts(
        &self,
        filter: &AdminAccountFilter,
    ) -> Result<Value, UpstreamError> {
        let request = self
            .rest(Method::GET, "/admin_accounts")?
            .query(&filter.to_query());
        send_json(TARGET, request).await
    }

    pub async fn create_admin_account(&self, body: &Value) -> Result<Value, UpstreamError> {
        send_json(TARGET, self.rest(Method::POST, "/admin_accounts")?.json(body)).await
    }

    pub async fn update_admin_account(&self, id: i64, patch: &Value) -> Result<Value, UpstreamError> {
        let path = format!("/admin_accounts?id=eq.{id}");
        send_json(TARGET, self.rest(Method::PATCH, &path)?.json(patch)).await
    }

    pub async fn delete_admin_account(&self, id: i64) -> Result<Value, UpstreamError> {
        let path = format!("/admin_accounts?id=eq.{id}");
        send_json(TARGET, self.rest(Method::DELETE, &path)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>) -> BackendConfig {
        BackendConfig {
            url: url.map(str::to_string),
            service_key: Some("service".into()),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_backend_fails_fast() {
        let client = BackendClient::new(&config(None), Duration::from_secs(1)).unwrap();
        assert!(!client.is_configured());

        let err = client.list_auth_users(1, 50).await.unwrap_err();
        assert!(matches!(err, UpstreamError::NotConfigured("SUPABASE_URL")));
    }

    #[test]
    fn test_request_headers_and_paths() {
        let client =
            BackendClient::new(&config(Some("https://db.example.com/")), Duration::from_secs(1))
                .unwrap();

        let request = client.rest(Method::GET, "/accounts").unwrap().build().unwrap();
        assert_eq!(request.url().as_str(), "https://db.example.com/rest/v1/accounts");
        assert_eq!(request.headers()["apikey"], "service");
        assert_eq!(request.headers()["authorization"], "Bearer service");

        let request = client.auth(Method::GET, "/users").unwrap().build().unwrap();
        assert_eq!(request.url().path(), "/auth/v1/admin/users");
        assert!(request.headers().get("prefer").is_none());
    }
}
