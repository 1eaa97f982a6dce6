//! TransIP DNS-01 solver

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::adapters::{KubeSecretStore, TransipClientFactory};
use crate::config::{load_config, SolverConfig};
use crate::credentials::CredentialResolver;
use crate::error::{CoreError, CoreResult};
use crate::services::DnsRecordClient;
use crate::traits::{DnsClientFactory, SecretStore, Solver, ZoneFinder};
use crate::types::ChallengeRequest;
use crate::zone::RecursiveZoneFinder;

/// Name the issuer references this solver by.
pub const SOLVER_NAME: &str = "transip";

const TXT_RECORD: &str = "TXT";

/// Presents and cleans up DNS-01 TXT records in a TransIP account.
///
/// Each call reads its configuration from the challenge, resolves credentials, opens a
/// fresh authenticated session and performs one idempotent add or remove. The only state
/// kept between calls is the secret store set by [`initialize`](Solver::initialize).
pub struct TransipSolver {
    secret_store: OnceLock<Arc<dyn SecretStore>>,
    client_factory: Arc<dyn DnsClientFactory>,
    zone_finder: Arc<dyn ZoneFinder>,
}

/// Builder for [`TransipSolver`]; unset collaborators get their production defaults.
#[derive(Default)]
pub struct TransipSolverBuilder {
    secret_store: Option<Arc<dyn SecretStore>>,
    client_factory: Option<Arc<dyn DnsClientFactory>>,
    zone_finder: Option<Arc<dyn ZoneFinder>>,
}

impl TransipSolverBuilder {
    /// Use this store instead of the one `initialize` would create.
    #[must_use]
    pub fn secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = Some(store);
        self
    }

    #[must_use]
    pub fn client_factory(mut self, factory: Arc<dyn DnsClientFactory>) -> Self {
        self.client_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn zone_finder(mut self, finder: Arc<dyn ZoneFinder>) -> Self {
        self.zone_finder = Some(finder);
        self
    }

    /// Fails only if no zone finder was given and the system resolver configuration
    /// cannot be read.
    pub fn build(self) -> CoreResult<TransipSolver> {
        let zone_finder = match self.zone_finder {
            Some(finder) => finder,
            None => Arc::new(RecursiveZoneFinder::from_system_conf()?),
        };
        Ok(TransipSolver {
            secret_store: self
                .secret_store
                .map_or_else(OnceLock::new, OnceLock::from),
            client_factory: self
                .client_factory
                .unwrap_or_else(|| Arc::new(TransipClientFactory)),
            zone_finder,
        })
    }
}

impl TransipSolver {
    pub fn builder() -> TransipSolverBuilder {
        TransipSolverBuilder::default()
    }

    /// Config, credentials and an open record client for `challenge`.
    async fn record_client(
        &self,
        challenge: &ChallengeRequest,
    ) -> CoreResult<(SolverConfig, DnsRecordClient)> {
        let store = self.secret_store.get().ok_or(CoreError::NotInitialized)?;

        let config = load_config(challenge.config.as_ref())?;
        log::debug!("Decoded config: {config}");

        let credential = CredentialResolver::new(store.as_ref())
            .resolve(&config, &challenge.resource_namespace)
            .await?;
        let mode = credential.mode();
        let repository = self
            .client_factory
            .connect(credential.into_client_configuration())
            .await?;

        Ok((
            config,
            DnsRecordClient::new(repository, self.zone_finder.clone(), mode),
        ))
    }

    async fn present_record(&self, challenge: &ChallengeRequest) -> CoreResult<()> {
        let (config, client) = self.record_client(challenge).await?;
        let domain_name = client.get_hosted_domain(&challenge.resolved_zone).await?;
        client
            .set_record(
                &domain_name,
                &challenge.resolved_fqdn,
                config.ttl_seconds(),
                TXT_RECORD,
                &challenge.key,
            )
            .await
    }

    async fn cleanup_record(&self, challenge: &ChallengeRequest) -> CoreResult<()> {
        let (config, client) = self.record_client(challenge).await?;
        let domain_name = client.get_hosted_domain(&challenge.resolved_zone).await?;
        client
            .delete_record(
                &domain_name,
                &challenge.resolved_fqdn,
                config.ttl_seconds(),
                TXT_RECORD,
                &challenge.key,
            )
            .await
    }
}

/// Logs a failed operation at `warn` for expected errors and `error` otherwise.
fn log_failure(
    operation: &str,
    challenge: &ChallengeRequest,
    result: CoreResult<()>,
) -> CoreResult<()> {
    if let Err(e) = &result {
        if e.is_expected() {
            log::warn!(
                "{operation} {} ({}) failed: {e}",
                challenge.resolved_fqdn,
                challenge.resolved_zone
            );
        } else {
            log::error!(
                "{operation} {} ({}) failed: {e}",
                challenge.resolved_fqdn,
                challenge.resolved_zone
            );
        }
    }
    result
}

#[async_trait]
impl Solver for TransipSolver {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    async fn initialize(
        &self,
        cluster_config: kube::Config,
        _shutdown: watch::Receiver<bool>,
    ) -> CoreResult<()> {
        if self.secret_store.get().is_some() {
            return Err(CoreError::AlreadyInitialized);
        }

        let store = KubeSecretStore::try_from_config(cluster_config)?;
        self.secret_store
            .set(Arc::new(store))
            .map_err(|_| CoreError::AlreadyInitialized)?;
        log::info!("Solver {SOLVER_NAME} initialized");
        Ok(())
    }

    async fn present(&self, challenge: &ChallengeRequest) -> CoreResult<()> {
        log::info!(
            "Presenting txt record: {} {}",
            challenge.resolved_fqdn,
            challenge.resolved_zone
        );
        let result = self.present_record(challenge).await;
        if result.is_ok() {
            log::info!(
                "new txt record has been set: {} {}",
                challenge.resolved_fqdn,
                challenge.resolved_zone
            );
        }
        log_failure("Present", challenge, result)
    }

    async fn cleanup(&self, challenge: &ChallengeRequest) -> CoreResult<()> {
        log::info!(
            "Cleanup txt record: {} {}",
            challenge.resolved_fqdn,
            challenge.resolved_zone
        );
        let result = self.cleanup_record(challenge).await;
        log_failure("CleanUp", challenge, result)
    }
}
