//! Request filters and row shapes for the hosted backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_limit() -> u32 {
    50
}

fn default_page() -> u32 {
    1
}

/// Drop blank query values; the console UI sends `key=` for empty inputs.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Query of `GET /api/accounts`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub query: String,
}

impl AccountsQuery {
    /// Auth admin API page for this offset: `max(1, offset / limit + 1)`.
    pub fn page(&self) -> u32 {
        self.offset / self.per_page() + 1
    }

    pub fn per_page(&self) -> u32 {
        self.limit.max(1)
    }
}

/// Query of `GET /api/auth/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUsersQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub per_page: u32,
}

/// Summary row returned by `GET /api/accounts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountRow {
    pub id: Value,
    pub email: Value,
    pub name: String,
    pub created_at: Value,
}

/// Users array from an auth admin list response (`{users: [...]}` or a bare array).
pub fn extract_users(data: &Value) -> &[Value] {
    match data {
        Value::Object(map) => map
            .get("users")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        Value::Array(users) => users.as_slice(),
        _ => &[],
    }
}

/// Filter users by case-insensitive substring of email or `user_metadata.name`.
pub fn summarize_accounts(data: &Value, query: &str) -> Vec<AccountRow> {
    let needle = query.trim().to_lowercase();

    extract_users(data)
        .iter()
        .filter_map(|user| {
            let email = user.get("email").and_then(Value::as_str).unwrap_or_default();
            let name = user
                .pointer("/user_metadata/name")
                .and_then(Value::as_str)
                .unwrap_or_default();

            let hit = needle.is_empty()
                || email.to_lowercase().contains(&needle)
                || name.to_lowercase().contains(&needle);
            hit.then(|| AccountRow {
                id: user.get("id").cloned().unwrap_or(Value::Null),
                email: user.get("email").cloned().unwrap_or(Value::Null),
                name: name.to_string(),
                created_at: user.get("created_at").cloned().unwrap_or(Value::Null),
            })
        })
        .collect()
}

/// Query of `GET /api/transactions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    pub account_id: Option<String>,
    pub status: Option<String>,
    pub provider: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl TransactionFilter {
    /// Account id, if given, must be numeric.
    pub fn account_id(&self) -> Result<Option<i64>, std::num::ParseIntError> {
        present(&self.account_id).map(str::parse).transpose()
    }

    /// PostgREST query parameters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut filters = Vec::new();
        if let Some(id) = present(&self.account_id) {
            filters.push(format!("account_id.eq.{id}"));
        }
        if let Some(status) = present(&self.status) {
            filters.push(format!("status.eq.{status}"));
        }
        if let Some(provider) = present(&self.provider) {
            filters.push(format!("provider.eq.{provider}"));
        }
        if let Some(from) = present(&self.date_from) {
            filters.push(format!("created_at.gte.{from}"));
        }
        if let Some(to) = present(&self.date_to) {
            filters.push(format!("created_at.lte.{to}"));
        }

        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "id.desc".to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if !filters.is_empty() {
            query.push(("and", format!("({})", filters.join(","))));
        }
        query
    }
}

/// Query of `GET /api/admin-accounts`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminAccountFilter {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    pub query: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

impl AdminAccountFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "id.desc".to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(text) = present(&self.query) {
            let pattern = ilike_pattern(text);
            query.push(("or", format!("(email.ilike.{pattern},name.ilike.{pattern})")));
        }
        if let Some(role) = present(&self.role) {
            query.push(("role", format!("eq.{role}")));
        }
        if let Some(status) = present(&self.status) {
            query.push(("status", format!("eq.{status}")));
        }
        query
    }
}

/// PostgREST `ilike` substring pattern; `*` in the input is dropped.
pub fn ilike_pattern(text: &str) -> String {
    format!("*{}*", text.replace('*', ""))
}

/// Body of `POST /api/auth/users`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewAuthUser {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_email_confirm")]
    pub email_confirm: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<Value>,
}

fn default_email_confirm() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_for_offset() {
        let q = |limit, offset| AccountsQuery { limit, offset, query: String::new() };
        assert_eq!(q(50, 0).page(), 1);
        assert_eq!(q(50, 49).page(), 1);
        assert_eq!(q(50, 100).page(), 3);
        assert_eq!(q(0, 10).page(), 11);
    }

    #[test]
    fn test_summarize_filters_by_email_or_name() {
        let data = json!({
            "users": [
                { "id": "u1", "email": "Alice@Example.com", "created_at": "2024-01-01", "user_metadata": { "name": "Alice" } },
                { "id": "u2", "email": "bob@example.com", "created_at": "2024-01-02", "user_metadata": {} },
                { "id": "u3", "email": null, "user_metadata": { "name": "Carol ALICESON" } }
            ]
        });

        let all = summarize_accounts(&data, "");
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].name, "");

        let hits = summarize_accounts(&data, "  alice ");
        let ids: Vec<_> = hits.iter().map(|row| row.id.clone()).collect();
        assert_eq!(ids, vec![json!("u1"), json!("u3")]);
    }

    #[test]
    fn test_summarize_accepts_bare_array() {
        let data = json!([{ "id": 1, "email": "x@y.z" }]);
        assert_eq!(summarize_accounts(&data, "x@").len(), 1);
        assert!(summarize_accounts(&json!("oops"), "").is_empty());
    }

    #[test]
    fn test_transaction_query() {
        let filter = TransactionFilter {
            limit: 10,
            offset: 20,
            account_id: Some("7".into()),
            status: Some("".into()),
            provider: Some("stripe".into()),
            date_from: None,
            date_to: Some("2024-12-31".into()),
        };
        let query = filter.to_query();
        assert!(query.contains(&("limit", "10".to_string())));
        assert!(query.contains(&("offset", "20".to_string())));
        assert!(query.contains(&(
            "and",
            "(account_id.eq.7,provider.eq.stripe,created_at.lte.2024-12-31)".to_string()
        )));
        assert_eq!(filter.account_id(), Ok(Some(7)));
    }

    #[test]
    fn test_transaction_query_without_filters() {
        let filter: TransactionFilter = serde_json::from_value(json!({ "accountId": "" })).unwrap();
        assert!(filter.to_query().iter().all(|(key, _)| *key != "and"));
        assert_eq!(filter.account_id(), Ok(None));
        assert_eq!(filter.limit, 50);
    }

    #[test]
    fn test_non_numeric_account_id() {
        let filter: TransactionFilter = serde_json::from_value(json!({ "accountId": "abc" })).unwrap();
        assert!(filter.account_id().is_err());
    }

    #[test]
    fn test_admin_account_query() {
        let filter = AdminAccountFilter {
            limit: 50,
            offset: 0,
            query: Some("a*b".into()),
            role: Some("owner".into()),
            status: None,
        };
        let query = filter.to_query();
        assert!(query.contains(&("or", "(email.ilike.*ab*,name.ilike.*ab*)".to_string())));
        assert!(query.contains(&("role", "eq.owner".to_string())));
        assert!(!query.iter().any(|(key, _)| *key == "status"));
    }

    #[test]
    fn test_new_auth_user_defaults() {
        let user: NewAuthUser = serde_json::from_value(json!({ "email": "a@b.c", "password": "pw" })).unwrap();
        assert!(user.email_confirm);
        let body = serde_json::to_value(&user).unwrap();
        assert_eq!(body, json!({ "email": "a@b.c", "password": "pw", "email_confirm": true }));
    }
}
