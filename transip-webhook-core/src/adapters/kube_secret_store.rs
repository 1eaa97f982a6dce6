//! Kubernetes Secret 读取

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};

use crate::error::{CoreError, CoreResult};
use crate::traits::{SecretData, SecretStore};

/// Reads `Secret` objects through the Kubernetes API.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the API client from connection settings.
    pub fn try_from_config(config: kube::Config) -> CoreResult<Self> {
        let client =
            Client::try_from(config).map_err(|e| CoreError::ClusterClient(e.to_string()))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> CoreResult<Option<SecretData>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = api.get_opt(name).await.map_err(|e| {
            CoreError::SecretStore(format!("reading secret '{namespace}/{name}': {e}"))
        })?;

        Ok(secret.map(|secret| {
            log::debug!("Loaded secret '{namespace}/{name}'");
            secret
                .data
                .unwrap_or_default()
                .into_iter()
                .map(|(key, value)| (key, value.0))
                .collect()
        }))
    }
}
