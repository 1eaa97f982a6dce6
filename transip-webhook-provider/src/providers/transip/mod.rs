//! TransIP DNS Provider

mod error;
mod http;
mod provider;
mod sign;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::traits::DnsEntryRepository;
use crate::types::{ApiMode, ClientConfiguration};
use crate::utils::log_sanitizer::mask_secret;

use sign::RequestSigner;

pub(crate) use types::{
    AuthRequest, AuthResponse, DnsEntriesResponse, DnsEntryBody, DomainResponse, ErrorResponse,
    PingResponse,
};

pub(crate) const PROVIDER_NAME: &str = "transip";
/// Production endpoint of the TransIP REST API.
pub const TRANSIP_API_BASE: &str = "https://api.transip.nl/v6";
/// Lifetime requested for access tokens. A solver call needs a few seconds at most.
pub(crate) const DEFAULT_TOKEN_EXPIRATION: &str = "30 minutes";
/// Prefix of the token label shown in the TransIP control panel.
pub(crate) const DEFAULT_TOKEN_LABEL: &str = "transip-webhook";

/// TransIP DNS client holding an authenticated session.
///
/// Created through [`TransipClient::builder`]; `connect` signs a token request with the
/// account's private key, stores the access token and runs the `/api-test` self-test.
///
/// ```rust,no_run
/// use transip_webhook_provider::{ClientConfiguration, DnsEntryRepository, TransipClient};
///
/// # async fn example() -> transip_webhook_provider::Result<()> {
/// let key = std::fs::read("transip.key").unwrap_or_default();
/// let client = TransipClient::builder(ClientConfiguration::new("my-account", key))
///     .connect()
///     .await?;
/// let entries = client.list_entries("example.com").await?;
/// # Ok(())
/// # }
/// ```
pub struct TransipClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) mode: ApiMode,
    pub(crate) token: String,
}

impl std::fmt::Debug for TransipClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransipClient")
            .field("base_url", &self.base_url)
            .field("mode", &self.mode)
            .field("token", &mask_secret(&self.token))
            .finish_non_exhaustive()
    }
}

/// Builder for [`TransipClient`].
pub struct TransipClientBuilder {
    config: ClientConfiguration,
    base_url: String,
    token_expiration: String,
    global_key: bool,
}

impl TransipClientBuilder {
    fn new(config: ClientConfiguration) -> Self {
        Self {
            config,
            base_url: TRANSIP_API_BASE.to_string(),
            token_expiration: DEFAULT_TOKEN_EXPIRATION.to_string(),
            global_key: true,
        }
    }

    /// Override the API endpoint (tests, staging proxies).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Requested token lifetime, e.g. `"30 minutes"`.
    #[must_use]
    pub fn token_expiration(mut self, expiration: impl Into<String>) -> Self {
        self.token_expiration = expiration.into();
        self
    }

    /// Whether the token may be used from any IP address (default `true`).
    ///
    /// Set to `false` only if the solver runs from an address whitelisted in the
    /// TransIP control panel.
    #[must_use]
    pub fn global_key(mut self, global_key: bool) -> Self {
        self.global_key = global_key;
        self
    }

    /// Authenticate and self-test, returning a ready client.
    pub async fn connect(self) -> Result<TransipClient> {
        let signer = RequestSigner::from_pem(&self.config.private_key)?;
        let client = create_http_client(PROVIDER_NAME)?;

        let auth = AuthRequest::new(
            &self.config.account_name,
            self.config.mode,
            &self.token_expiration,
            DEFAULT_TOKEN_LABEL,
            self.global_key,
        );
        let token = http::request_token(&client, &self.base_url, &signer, &auth).await?;

        let transip = TransipClient {
            client,
            base_url: self.base_url,
            mode: self.config.mode,
            token,
        };
        transip.test_connection().await?;

        log::debug!(
            "[{PROVIDER_NAME}] Session opened for account {} ({:?})",
            self.config.account_name,
            transip.mode
        );
        Ok(transip)
    }
}

impl TransipClient {
    /// Returns a builder for an authenticated client.
    pub fn builder(config: ClientConfiguration) -> TransipClientBuilder {
        TransipClientBuilder::new(config)
    }
}
