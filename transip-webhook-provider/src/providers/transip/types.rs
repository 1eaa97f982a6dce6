//! TransIP API 类型定义

use serde::{Deserialize, Serialize};

use crate::types::{ApiMode, DnsEntry, Domain};

/// `POST /auth` 请求体
///
/// The exact serialized bytes are what gets signed, so the body is serialized once and
/// sent as-is.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthRequest {
    pub login: String,
    pub nonce: String,
    pub read_only: bool,
    pub expiration_time: String,
    pub label: String,
    pub global_key: bool,
}

impl AuthRequest {
    pub fn new(
        login: &str,
        mode: ApiMode,
        expiration_time: &str,
        label_prefix: &str,
        global_key: bool,
    ) -> Self {
        // TransIP accepts nonces of at most 32 characters; the simple uuid form is exactly 32.
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        // Labels must be unique among an account's active tokens.
        let label = format!("{label_prefix}-{}", &nonce[..12]);
        Self {
            login: login.to_string(),
            nonce,
            read_only: mode.is_read_only(),
            expiration_time: expiration_time.to_string(),
            label,
            global_key,
        }
    }
}

/// `POST /auth` 响应
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// `GET /api-test` 响应
#[derive(Debug, Deserialize)]
pub struct PingResponse {
    pub ping: String,
}

/// `GET /domains/{name}` 响应
#[derive(Debug, Deserialize)]
pub struct DomainResponse {
    pub domain: Domain,
}

/// `GET /domains/{name}/dns` 响应
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsEntriesResponse {
    #[serde(default)]
    pub dns_entries: Vec<DnsEntry>,
}

/// `POST` / `DELETE /domains/{name}/dns` 请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsEntryBody<'a> {
    pub dns_entry: &'a DnsEntry,
}

/// TransIP 错误响应: `{"error": "..."}`
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
