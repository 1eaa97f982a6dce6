//! Shared HTTP plumbing
//!
//! The provider builds each request (URL, bearer token, signed body); this module sends it,
//! logs the exchange and turns transport failures into [`ProviderError`]s.
//! A request is sent once. Retrying is left to the caller.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP helpers shared by provider implementations.
pub struct HttpUtils;

impl HttpUtils {
    /// Send `request_builder` and return `(status, body)`.
    ///
    /// `method_name` and `url_or_action` only feed the debug log. Statuses that say nothing
    /// about the request itself (429 and the 502-504 gateway family) become errors here;
    /// every other status is returned for the provider's own error mapping.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url_or_action}");

        let response = request_builder
            .send()
            .await
            .map_err(|e| transport_error(provider_name, &e))?;
        let status = response.status();
        log::debug!("[{provider_name}] -> HTTP {}", status.as_u16());

        // Read before the body consumes the response.
        let retry_after = retry_after_secs(&response);
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("failed to read response body: {e}"),
            })?;

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                log::warn!("[{provider_name}] HTTP 429, retry_after={retry_after:?}");
                Err(ProviderError::RateLimited {
                    provider: provider_name.to_string(),
                    retry_after,
                    raw_message: Some(body),
                })
            }
            StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                log::warn!("[{provider_name}] Gateway error HTTP {}", status.as_u16());
                Err(ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: format!("HTTP {}: {}", status.as_u16(), truncate_for_log(&body)),
                })
            }
            _ => {
                log::debug!("[{provider_name}] <- {}", truncate_for_log(&body));
                Ok((status.as_u16(), body))
            }
        }
    }

    /// Decode a JSON body, mapping failures to [`ProviderError::ParseError`].
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!(
                "[{provider_name}] Unexpected response ({e}): {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

fn transport_error(provider_name: &str, e: &reqwest::Error) -> ProviderError {
    let provider = provider_name.to_string();
    let detail = e.to_string();
    if e.is_timeout() {
        ProviderError::Timeout { provider, detail }
    } else {
        ProviderError::NetworkError { provider, detail }
    }
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
