//! Client factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::TransipClient;
use crate::traits::DnsEntryRepository;
use crate::types::ClientConfiguration;

/// Opens an authenticated [`DnsEntryRepository`] against the production TransIP API.
///
/// The returned client is wrapped in `Arc<dyn DnsEntryRepository>` so it can be handed
/// to services that only know the trait.
///
/// # Examples
///
/// ```rust,no_run
/// use transip_webhook_provider::{ApiMode, ClientConfiguration, connect};
///
/// # async fn example(key: Vec<u8>) -> transip_webhook_provider::Result<()> {
/// let config = ClientConfiguration::new("my-account", key).with_mode(ApiMode::ReadOnly);
/// let client = connect(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn connect(config: ClientConfiguration) -> Result<Arc<dyn DnsEntryRepository>> {
    let client = TransipClient::builder(config).connect().await?;
    Ok(Arc::new(client))
}
