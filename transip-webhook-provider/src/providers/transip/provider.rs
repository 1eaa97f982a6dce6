//! TransIP DnsEntryRepository trait 实现

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::providers::common::normalize_domain_name;
use crate::traits::{DnsEntryRepository, ErrorContext, ProviderErrorMapper};
use crate::types::{DnsEntry, Domain};

use super::{
    DnsEntriesResponse, DnsEntryBody, DomainResponse, PROVIDER_NAME, PingResponse, TransipClient,
};

impl TransipClient {
    /// `/domains/{name}`, tolerating a trailing dot
    fn domain_path(domain_name: &str) -> String {
        format!(
            "/domains/{}",
            urlencoding::encode(&normalize_domain_name(domain_name))
        )
    }

    /// `/domains/{name}/dns`
    fn dns_path(domain_name: &str) -> String {
        format!("{}/dns", Self::domain_path(domain_name))
    }
}

#[async_trait]
impl DnsEntryRepository for TransipClient {
    fn id(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn test_connection(&self) -> Result<()> {
        let response: PingResponse = self.get("/api-test", ErrorContext::default()).await?;
        if response.ping != "pong" {
            return Err(self.parse_error(format!(
                "unexpected /api-test answer '{}'",
                response.ping
            )));
        }
        Ok(())
    }

    async fn get_domain(&self, domain_name: &str) -> Result<Domain> {
        let response: DomainResponse = self
            .get(&Self::domain_path(domain_name), ErrorContext::domain(domain_name))
            .await?;
        Ok(response.domain)
    }

    async fn list_entries(&self, domain_name: &str) -> Result<Vec<DnsEntry>> {
        let response: DnsEntriesResponse = self
            .get(&Self::dns_path(domain_name), ErrorContext::domain(domain_name))
            .await?;
        log::debug!(
            "[{PROVIDER_NAME}] {} entries in {domain_name}",
            response.dns_entries.len()
        );
        Ok(response.dns_entries)
    }

    async fn add_entry(&self, domain_name: &str, entry: &DnsEntry) -> Result<()> {
        self.send(
            Method::POST,
            &Self::dns_path(domain_name),
            &DnsEntryBody { dns_entry: entry },
            ErrorContext::record(domain_name, &entry.name),
        )
        .await?;
        log::info!("[{PROVIDER_NAME}] Added {entry} to {domain_name}");
        Ok(())
    }

    async fn remove_entry(&self, domain_name: &str, entry: &DnsEntry) -> Result<()> {
        self.send(
            Method::DELETE,
            &Self::dns_path(domain_name),
            &DnsEntryBody { dns_entry: entry },
            ErrorContext::record(domain_name, &entry.name),
        )
        .await?;
        log::info!("[{PROVIDER_NAME}] Removed {entry} from {domain_name}");
        Ok(())
    }
}
