use std::sync::Arc;

use async_trait::async_trait;
use transip_webhook_provider::{ClientConfiguration, DnsEntryRepository};

use crate::error::{CoreError, CoreResult};
use crate::traits::DnsClientFactory;

/// Connects to the production TransIP API.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransipClientFactory;

#[async_trait]
impl DnsClientFactory for TransipClientFactory {
    async fn connect(
        &self,
        config: ClientConfiguration,
    ) -> CoreResult<Arc<dyn DnsEntryRepository>> {
        transip_webhook_provider::connect(config)
            .await
            .map_err(CoreError::remote("could not setup TransIP API client"))
    }
}
