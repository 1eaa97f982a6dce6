//! DNS-01 Solver Trait

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::CoreResult;
use crate::types::ChallengeRequest;

/// Contract between the certificate controller and a DNS-01 solver.
///
/// `present` must tolerate being called repeatedly with the same challenge. `cleanup` must
/// only remove the record carrying the challenge's `key`, so several validations for the
/// same name can run side by side.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Name the issuer references this solver by.
    fn name(&self) -> &'static str;

    /// Called once at startup with the cluster connection settings.
    ///
    /// `shutdown` flips to `true` when the process is asked to stop.
    async fn initialize(
        &self,
        cluster_config: kube::Config,
        shutdown: watch::Receiver<bool>,
    ) -> CoreResult<()>;

    /// Publishes the TXT record for `challenge`.
    async fn present(&self, challenge: &ChallengeRequest) -> CoreResult<()>;

    /// Removes the TXT record for `challenge`.
    async fn cleanup(&self, challenge: &ChallengeRequest) -> CoreResult<()>;
}
