//! # transip-webhook-provider
//!
//! A small client for the [TransIP](https://www.transip.nl/) v6 REST API, limited to what
//! an ACME DNS-01 solver needs: authenticate, look up a domain, list its DNS entries and
//! add or remove single entries.
//!
//! ## Authentication
//!
//! TransIP issues short-lived bearer tokens. A token is requested with `POST /auth`, whose
//! JSON body is signed with the account's RSA private key (PKCS#1 v1.5, SHA-512). Both PKCS#8
//! (`BEGIN PRIVATE KEY`) and PKCS#1 (`BEGIN RSA PRIVATE KEY`) PEM keys are accepted.
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: Use rustls.
//! - **`native-tls`**: Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use transip_webhook_provider::{ClientConfiguration, DnsEntry, DnsEntryRepository, connect};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let key = std::fs::read("transip.key")?;
//!     let client = connect(ClientConfiguration::new("my-account", key)).await?;
//!
//!     let entry = DnsEntry::new("_acme-challenge", 60, "TXT", "token");
//!     client.add_entry("example.com", &entry).await?;
//!     client.remove_entry("example.com", &entry).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Read-only mode
//!
//! A client built with [`ApiMode::ReadOnly`] requests a read-only token and refuses
//! `add_entry` / `remove_entry` locally with [`ProviderError::ReadOnlyMode`].
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`]: token request rejected
//! - [`ProviderError::InvalidPrivateKey`]: the PEM key could not be used for signing
//! - [`ProviderError::DomainNotFound`]: the account does not host the domain
//! - [`ProviderError::RateLimited`] / [`ProviderError::NetworkError`]: transient failures
//!
//! Nothing is retried internally.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::connect;

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsEntryRepository;

// Re-export types
pub use types::{ApiMode, ClientConfiguration, DnsEntry, Domain};

// Re-export utils module
pub use utils::log_sanitizer;

// Re-export concrete client
pub use providers::{TRANSIP_API_BASE, TransipClient, TransipClientBuilder};
