//! 权威区域查找 Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// Finds the authoritative zone of a name.
#[async_trait]
pub trait ZoneFinder: Send + Sync {
    /// Returns the zone apex holding `fqdn`, fully qualified (`example.com.`).
    async fn find_zone_by_fqdn(&self, fqdn: &str) -> CoreResult<String>;
}
