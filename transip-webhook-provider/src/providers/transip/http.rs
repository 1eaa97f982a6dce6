//! TransIP HTTP 请求方法

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::mask_secret;

use super::error::map_transip_error;
use super::sign::RequestSigner;
use super::{AuthRequest, AuthResponse, ErrorResponse, PROVIDER_NAME, TransipClient};

/// Exchange a signed `POST /auth` for an access token.
pub(crate) async fn request_token(
    client: &Client,
    base_url: &str,
    signer: &RequestSigner,
    auth: &AuthRequest,
) -> Result<String> {
    let body = serde_json::to_vec(auth).map_err(|e| ProviderError::SerializationError {
        provider: PROVIDER_NAME.to_string(),
        detail: e.to_string(),
    })?;
    let signature = signer.sign(&body)?;
    log::debug!(
        "[{PROVIDER_NAME}] Requesting token for {} (label {}, read_only {}, signature {})",
        auth.login,
        auth.label,
        auth.read_only,
        mask_secret(&signature)
    );

    let url = format!("{base_url}/auth");
    let request = client
        .post(&url)
        .header(CONTENT_TYPE, "application/json")
        .header("Signature", signature)
        .body(body);

    let (status, text) = HttpUtils::execute_request(request, PROVIDER_NAME, "POST", &url).await?;
    if status >= 400 {
        return Err(map_transip_error(
            error_from_body(status, &text),
            ErrorContext::default(),
        ));
    }

    let auth: AuthResponse = HttpUtils::parse_json(&text, PROVIDER_NAME)?;
    log::debug!("[{PROVIDER_NAME}] Token issued: {}", mask_secret(&auth.token));
    Ok(auth.token)
}

/// Build a [`RawApiError`] from a TransIP error response, falling back to the raw body.
fn error_from_body(status: u16, text: &str) -> RawApiError {
    let message = serde_json::from_str::<ErrorResponse>(text)
        .map(|e| e.error)
        .unwrap_or_else(|_| text.trim().to_string());
    RawApiError::with_code(status.to_string(), message)
}

impl TransipClient {
    fn authorized(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let url = format!("{}{path}", self.base_url);
        let request = self
            .client
            .request(method, &url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token));
        (request, url)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        method: &Method,
        url: &str,
        ctx: ErrorContext,
    ) -> Result<String> {
        let (status, text) =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), url)
                .await?;

        if status >= 400 {
            let raw = error_from_body(status, &text);
            log::error!("[{PROVIDER_NAME}] API error: HTTP {status} - {}", raw.message);
            return Err(self.map_error(raw, ctx));
        }
        Ok(text)
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, ctx: ErrorContext) -> Result<T> {
        let (request, url) = self.authorized(Method::GET, path);
        let text = self.execute(request, &Method::GET, &url, ctx).await?;
        HttpUtils::parse_json(&text, self.provider_name())
    }

    /// 执行写请求 (POST / DELETE)，响应体被忽略
    ///
    /// Refused locally when the client is read-only.
    pub(crate) async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<()> {
        if self.mode.is_read_only() {
            log::warn!("[{PROVIDER_NAME}] Read-only mode, not sending {method} {path}");
            return Err(ProviderError::ReadOnlyMode {
                provider: PROVIDER_NAME.to_string(),
                operation: format!("{method} {path}"),
            });
        }

        let (request, url) = self.authorized(method.clone(), path);
        let request = request.json(body);
        self.execute(request, &method, &url, ctx).await.map(|_| ())
    }
}
