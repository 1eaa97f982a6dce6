//! TransIP 错误映射

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{PROVIDER_NAME, TransipClient};

/// TransIP 错误码映射
///
/// TransIP has no error codes beyond the HTTP status; the body is `{"error": "<message>"}`.
/// 参考: <https://api.transip.nl/rest/docs.html#header-errors>
pub(crate) fn map_transip_error(raw: RawApiError, context: ErrorContext) -> ProviderError {
    let provider = PROVIDER_NAME.to_string();
    match raw.code.as_deref() {
        // ============ 认证错误 ============
        Some("401") => ProviderError::InvalidCredentials {
            provider,
            raw_message: Some(raw.message),
        },

        // ============ 权限/只读令牌 ============
        Some("403") => ProviderError::PermissionDenied {
            provider,
            raw_message: Some(raw.message),
        },

        // ============ 资源不存在 ============
        Some("404") => match (context.record_name, context.domain) {
            (Some(record_name), _) => ProviderError::RecordNotFound {
                provider,
                record_name,
                raw_message: Some(raw.message),
            },
            (None, Some(domain)) => ProviderError::DomainNotFound {
                provider,
                domain,
                raw_message: Some(raw.message),
            },
            (None, None) => unknown(raw),
        },

        // ============ 记录冲突 ============
        Some("409") => ProviderError::RecordExists {
            provider,
            record_name: context.record_name.unwrap_or_default(),
            raw_message: Some(raw.message),
        },

        // ============ 参数无效 ============
        Some("400" | "406" | "422") => ProviderError::InvalidParameter {
            provider,
            param: if context.record_name.is_some() {
                "dnsEntry".to_string()
            } else {
                "request".to_string()
            },
            detail: raw.message,
        },

        // ============ 服务端错误 ============
        Some(code) if code.starts_with('5') => ProviderError::NetworkError {
            provider,
            detail: format!("HTTP {code}: {}", raw.message),
        },

        // ============ 其他错误 fallback ============
        _ => unknown(raw),
    }
}

fn unknown(raw: RawApiError) -> ProviderError {
    ProviderError::Unknown {
        provider: PROVIDER_NAME.to_string(),
        raw_code: raw.code,
        raw_message: raw.message,
    }
}

impl ProviderErrorMapper for TransipClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        map_transip_error(raw, context)
    }
}
