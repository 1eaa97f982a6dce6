use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{DnsEntry, Domain};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（TransIP 使用 HTTP 状态码）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists` / `RecordNotFound`）
    pub record_name: Option<String>,
    /// 域名（用于 `DomainNotFound`）
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            ..Self::default()
        }
    }

    pub fn record(domain: &str, record_name: &str) -> Self {
        Self {
            record_name: Some(record_name.to_string()),
            domain: Some(domain.to_string()),
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }
}

/// The four DNS operations an ACME DNS-01 solver needs, plus a connectivity check.
///
/// Implementations hold an authenticated session. The mode they were created with
/// never changes; a `ReadOnly` repository must reject [`add_entry`](Self::add_entry)
/// and [`remove_entry`](Self::remove_entry) without contacting the remote side.
#[async_trait]
pub trait DnsEntryRepository: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// Cheap authenticated round-trip used to verify the session works.
    async fn test_connection(&self) -> Result<()>;

    /// Looks up a domain hosted in the account.
    ///
    /// Returns [`ProviderError::DomainNotFound`] if the account does not host it.
    async fn get_domain(&self, domain_name: &str) -> Result<Domain>;

    /// Lists every DNS entry of a domain.
    async fn list_entries(&self, domain_name: &str) -> Result<Vec<DnsEntry>>;

    /// Adds a DNS entry to a domain.
    async fn add_entry(&self, domain_name: &str, entry: &DnsEntry) -> Result<()>;

    /// Removes the DNS entry matching `entry` on all fields.
    async fn remove_entry(&self, domain_name: &str, entry: &DnsEntry) -> Result<()>;
}
