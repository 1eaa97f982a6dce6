//! 区域/记录名解析
//!
//! Splits a challenge name like `_acme-challenge.www.example.com.` into the domain hosted at
//! TransIP (`example.com`) and the entry name relative to it (`_acme-challenge.www`).

use async_trait::async_trait;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::{ResolveError, TokioResolver};

use crate::error::{CoreError, CoreResult};
use crate::traits::ZoneFinder;

/// Strips one trailing dot.
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Appends a trailing dot if missing.
pub fn to_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Registered domain for a challenge zone.
///
/// Asks `finder` for the authoritative zone. If that fails the given zone is used as-is
/// (without trailing dot), so a later domain lookup reports the actual problem.
pub async fn extract_domain_name(finder: &dyn ZoneFinder, zone: &str) -> String {
    match finder.find_zone_by_fqdn(zone).await {
        Ok(auth_zone) => un_fqdn(&auth_zone).to_string(),
        Err(e) => {
            log::warn!("could not get zone by fqdn {zone}: {e}");
            un_fqdn(zone).to_string()
        }
    }
}

/// Entry name of `fqdn` relative to `domain`.
///
/// Everything before the first occurrence of `.{domain}`; if `domain` does not occur,
/// `fqdn` without its trailing dot.
pub fn extract_record_name(fqdn: &str, domain: &str) -> String {
    match fqdn.find(&format!(".{domain}")) {
        Some(idx) => fqdn[..idx].to_string(),
        None => un_fqdn(fqdn).to_string(),
    }
}

// ============ SOA 递归查找 ============

/// Finds zones with SOA queries through the system resolver.
///
/// Walks from the full name towards the root (`a.b.example.com.`, `b.example.com.`,
/// `example.com.`, `com.`) and returns the first name that owns an SOA record.
/// Only NXDOMAIN and empty NOERROR answers move the walk up a label; any other failure
/// (SERVFAIL, REFUSED, timeouts) ends it with [`CoreError::ZoneLookup`].
pub struct RecursiveZoneFinder {
    resolver: TokioResolver,
}

impl RecursiveZoneFinder {
    /// Uses the system resolver configuration (`/etc/resolv.conf` on Unix).
    pub fn from_system_conf() -> CoreResult<Self> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| CoreError::ZoneNotFound(format!("system resolver unavailable: {e}")))?
            .build();
        Ok(Self { resolver })
    }

    pub fn new(resolver: TokioResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ZoneFinder for RecursiveZoneFinder {
    async fn find_zone_by_fqdn(&self, fqdn: &str) -> CoreResult<String> {
        let fqdn = to_fqdn(fqdn);
        let labels: Vec<&str> = un_fqdn(&fqdn).split('.').collect();

        for start in 0..labels.len() {
            let candidate = format!("{}.", labels[start..].join("."));
            match self.resolver.soa_lookup(candidate.as_str()).await {
                Ok(response) => {
                    // A CNAME'd or delegated name can answer with the parent's SOA.
                    let owns_soa = response.as_lookup().record_iter().any(|record| {
                        record.record_type() == RecordType::SOA
                            && un_fqdn(&record.name().to_ascii())
                                .eq_ignore_ascii_case(un_fqdn(&candidate))
                    });
                    if owns_soa {
                        log::debug!("Authoritative zone for {fqdn} is {candidate}");
                        return Ok(candidate);
                    }
                }
                Err(e) if is_missing_record(&e) => log::debug!("No SOA at {candidate}: {e}"),
                Err(e) => {
                    return Err(CoreError::ZoneLookup {
                        name: candidate,
                        detail: e.to_string(),
                    })
                }
            }
        }

        Err(CoreError::ZoneNotFound(fqdn))
    }
}

/// NXDOMAIN, or NOERROR without an SOA for the name.
fn is_missing_record(error: &ResolveError) -> bool {
    error.proto().is_some_and(|proto| {
        matches!(
            proto.kind(),
            ProtoErrorKind::NoRecordsFound {
                response_code: ResponseCode::NXDomain | ResponseCode::NoError,
                ..
            }
        )
    })
}
