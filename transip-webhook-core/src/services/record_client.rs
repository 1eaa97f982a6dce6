//! DNS 记录客户端
//!
//! Idempotent add/remove of a single TXT entry on top of a [`DnsEntryRepository`].

use std::sync::Arc;

use transip_webhook_provider::{ApiMode, DnsEntry, DnsEntryRepository};

use crate::error::{CoreError, CoreResult};
use crate::traits::ZoneFinder;
use crate::zone::{extract_domain_name, extract_record_name};

/// DNS 记录客户端
///
/// Entries are matched on name, TTL, type and content together. An entry that differs in
/// any of them (another validation's token, a different TTL) is left alone.
pub struct DnsRecordClient {
    repository: Arc<dyn DnsEntryRepository>,
    zone_finder: Arc<dyn ZoneFinder>,
    mode: ApiMode,
}

impl DnsRecordClient {
    /// 创建记录客户端
    ///
    /// In [`ApiMode::ReadOnly`] no add or remove ever reaches `repository`.
    #[must_use]
    pub fn new(
        repository: Arc<dyn DnsEntryRepository>,
        zone_finder: Arc<dyn ZoneFinder>,
        mode: ApiMode,
    ) -> Self {
        Self {
            repository,
            zone_finder,
            mode,
        }
    }

    /// Name of the hosted domain serving `zone`.
    pub async fn get_hosted_domain(&self, zone: &str) -> CoreResult<String> {
        let domain_name = extract_domain_name(self.zone_finder.as_ref(), zone).await;
        let domain = self
            .repository
            .get_domain(&domain_name)
            .await
            .map_err(CoreError::remote(format!("could not get domain {domain_name}")))?;
        Ok(domain.name)
    }

    /// Ensures the entry exists. Adding is skipped when an equal entry is already there.
    pub async fn set_record(
        &self,
        domain_name: &str,
        fqdn: &str,
        ttl: u32,
        record_type: &str,
        content: &str,
    ) -> CoreResult<()> {
        let entry = Self::build_entry(domain_name, fqdn, ttl, record_type, content);
        let entries = self.list_entries(domain_name).await?;

        if entries.contains(&entry) {
            log::info!(
                "ACME DNS entry {} already exists in domain {domain_name}, skip",
                entry.name
            );
            return Ok(());
        }

        if self.mode.is_read_only() {
            log::info!("[dry-run] would create ACME DNS entry {entry} in domain {domain_name}");
            return Ok(());
        }

        log::info!("Creating ACME DNS entry {entry} in domain {domain_name}");
        self.repository
            .add_entry(domain_name, &entry)
            .await
            .map_err(CoreError::remote("could not add DNS record"))
    }

    /// Removes the equal entry if present. A missing entry is not an error.
    pub async fn delete_record(
        &self,
        domain_name: &str,
        fqdn: &str,
        ttl: u32,
        record_type: &str,
        content: &str,
    ) -> CoreResult<()> {
        let entry = Self::build_entry(domain_name, fqdn, ttl, record_type, content);
        let entries = self.list_entries(domain_name).await?;

        if !entries.contains(&entry) {
            log::info!("ACME DNS entry not found matching {entry}");
            return Ok(());
        }

        if self.mode.is_read_only() {
            log::info!("[dry-run] would remove ACME DNS entry {entry} from domain {domain_name}");
            return Ok(());
        }

        log::info!("Removing ACME DNS entry {entry} from domain {domain_name}");
        self.repository
            .remove_entry(domain_name, &entry)
            .await
            .map_err(CoreError::remote("could not remove DNS record"))
    }

    fn build_entry(
        domain_name: &str,
        fqdn: &str,
        ttl: u32,
        record_type: &str,
        content: &str,
    ) -> DnsEntry {
        DnsEntry::new(
            extract_record_name(fqdn, domain_name),
            ttl,
            record_type,
            content,
        )
    }

    async fn list_entries(&self, domain_name: &str) -> CoreResult<Vec<DnsEntry>> {
        self.repository
            .list_entries(domain_name)
            .await
            .map_err(CoreError::remote(format!(
                "could not list DNS entries of {domain_name}"
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeDnsApi, MockZoneFinder};

    const FQDN: &str = "_acme-challenge.example.com.";
    const TOKEN: &str = "LHDhK3oGRvkiefQnx7OOczTY5Tic_xZ6HcMOc_gmtoM";

    fn client(api: &Arc<FakeDnsApi>, mode: ApiMode) -> DnsRecordClient {
        DnsRecordClient::new(
            api.clone(),
            Arc::new(MockZoneFinder::with_zone("example.com.")),
            mode,
        )
    }

    #[tokio::test]
    async fn hosted_domain_via_zone_finder() {
        let api = Arc::new(FakeDnsApi::with_domain("example.com"));
        let client = DnsRecordClient::new(
            api.clone(),
            Arc::new(MockZoneFinder::with_zone("example.com.")),
            ApiMode::ReadWrite,
        );

        let domain = client.get_hosted_domain("www.example.com.").await;
        assert!(matches!(&domain, Ok(d) if d == "example.com"), "{domain:?}");
    }

    #[tokio::test]
    async fn unknown_domain_is_error() {
        let api = Arc::new(FakeDnsApi::with_domain("example.com"));
        let client = DnsRecordClient::new(
            api,
            Arc::new(MockZoneFinder::failing()),
            ApiMode::ReadWrite,
        );

        let domain = client.get_hosted_domain("example.org.").await;
        assert!(matches!(
            &domain,
            Err(e) if matches!(e, CoreError::Remote { .. })
                && e.to_string().starts_with("could not get domain example.org")
        ));
    }

    #[tokio::test]
    async fn set_record_twice_adds_once() {
        let api = Arc::new(FakeDnsApi::with_domain("example.com"));
        let client = client(&api, ApiMode::ReadWrite);

        assert!(client.set_record("example.com", FQDN, 60, "TXT", TOKEN).await.is_ok());
        assert!(client.set_record("example.com", FQDN, 60, "TXT", TOKEN).await.is_ok());

        assert_eq!(api.add_calls(), 1);
        assert_eq!(
            api.entries("example.com"),
            vec![DnsEntry::new("_acme-challenge", 60, "TXT", TOKEN)]
        );
    }

    #[tokio::test]
    async fn set_record_with_other_ttl_is_distinct() {
        let api = Arc::new(FakeDnsApi::with_domain("example.com"));
        api.seed("example.com", DnsEntry::new("_acme-challenge", 300, "TXT", TOKEN));
        let client = client(&api, ApiMode::ReadWrite);

        assert!(client.set_record("example.com", FQDN, 60, "TXT", TOKEN).await.is_ok());
        assert_eq!(api.add_calls(), 1);
        assert_eq!(api.entries("example.com").len(), 2);
    }

    #[tokio::test]
    async fn delete_record_without_match_is_noop() {
        let api = Arc::new(FakeDnsApi::with_domain("example.com"));
        api.seed("example.com", DnsEntry::new("_acme-challenge", 60, "TXT", "other-token"));
        let client = client(&api, ApiMode::ReadWrite);

        assert!(client.delete_record("example.com", FQDN, 60, "TXT", TOKEN).await.is_ok());
        assert_eq!(api.remove_calls(), 0);
        assert_eq!(api.entries("example.com").len(), 1);
    }

    #[tokio::test]
    async fn delete_record_removes_exact_match_once() {
        let api = Arc::new(FakeDnsApi::with_domain("example.com"));
        api.seed("example.com", DnsEntry::new("_acme-challenge", 60, "TXT", TOKEN));
        api.seed("example.com", DnsEntry::new("_acme-challenge", 60, "TXT", "other-token"));
        let client = client(&api, ApiMode::ReadWrite);

        assert!(client.delete_record("example.com", FQDN, 60, "TXT", TOKEN).await.is_ok());
        assert_eq!(api.remove_calls(), 1);
        assert_eq!(
            api.entries("example.com"),
            vec![DnsEntry::new("_acme-challenge", 60, "TXT", "other-token")]
        );
    }

    #[tokio::test]
    async fn read_only_never_mutates() {
        let api = Arc::new(FakeDnsApi::with_domain("example.com"));
        api.seed("example.com", DnsEntry::new("_acme-challenge", 60, "TXT", "old"));
        let client = client(&api, ApiMode::ReadOnly);

        assert!(client.set_record("example.com", FQDN, 60, "TXT", TOKEN).await.is_ok());
        assert!(client.delete_record("example.com", FQDN, 60, "TXT", "old").await.is_ok());

        assert_eq!(api.add_calls(), 0);
        assert_eq!(api.remove_calls(), 0);
        assert_eq!(api.entries("example.com").len(), 1);
    }

    #[tokio::test]
    async fn add_failure_is_wrapped() {
        let api = Arc::new(FakeDnsApi::with_domain("example.com"));
        api.fail_mutations();
        let client = client(&api, ApiMode::ReadWrite);

        let result = client.set_record("example.com", FQDN, 60, "TXT", TOKEN).await;
        assert!(matches!(
            &result,
            Err(e) if e.to_string().starts_with("could not add DNS record: ")
        ));
        assert_eq!(api.add_calls(), 1);
    }
}
