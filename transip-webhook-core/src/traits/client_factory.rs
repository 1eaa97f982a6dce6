//! DNS 客户端工厂 Trait

use std::sync::Arc;

use async_trait::async_trait;
use transip_webhook_provider::{ClientConfiguration, DnsEntryRepository};

use crate::error::CoreResult;

/// Opens an authenticated DNS API session for one request.
///
/// Production uses [`TransipClientFactory`](crate::adapters::TransipClientFactory); tests
/// hand out an in-memory repository.
#[async_trait]
pub trait DnsClientFactory: Send + Sync {
    async fn connect(&self, config: ClientConfiguration)
        -> CoreResult<Arc<dyn DnsEntryRepository>>;
}
