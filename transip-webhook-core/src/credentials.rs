//! 凭证解析
//!
//! Turns a [`SolverConfig`] into the account name and private key used to open a TransIP
//! session, reading secrets where the configuration points to them.

use std::fmt;

use transip_webhook_provider::{ApiMode, ClientConfiguration};

use crate::config::SolverConfig;
use crate::error::{CoreError, CoreResult};
use crate::traits::SecretStore;

/// Key holding the account name in a `secretRef` secret.
pub const ACCOUNT_NAME_KEY: &str = "accountName";
/// Key holding the PEM private key in a `secretRef` secret.
pub const PRIVATE_KEY_KEY: &str = "privateKey";

/// Resolved TransIP credentials for one request. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub account_name: String,
    pub private_key: Vec<u8>,
    pub dry_run: bool,
}

impl Credential {
    pub fn mode(&self) -> ApiMode {
        ApiMode::from_dry_run(self.dry_run)
    }

    pub fn into_client_configuration(self) -> ClientConfiguration {
        let mode = self.mode();
        ClientConfiguration::new(self.account_name, self.private_key).with_mode(mode)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("account_name", &self.account_name)
            .field("private_key", &"<****>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Resolves credentials against a secret store.
pub struct CredentialResolver<'a> {
    store: &'a dyn SecretStore,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(store: &'a dyn SecretStore) -> Self {
        Self { store }
    }

    /// Resolves `config` for a challenge issued from `default_namespace`.
    ///
    /// - `secretRef`: account name and key both come from that secret, in its own namespace
    ///   if given, otherwise `default_namespace`.
    /// - otherwise the inline account name, with the key from `privateKeySecretRef`
    ///   (in `default_namespace`) or inline.
    pub async fn resolve(
        &self,
        config: &SolverConfig,
        default_namespace: &str,
    ) -> CoreResult<Credential> {
        let (account_name, private_key) = if config.secret_ref.is_set() {
            let namespace = if config.secret_ref.namespace.is_empty() {
                default_namespace
            } else {
                config.secret_ref.namespace.as_str()
            };
            let name = config.secret_ref.name.as_str();

            let account_name = self.secret_value(namespace, name, ACCOUNT_NAME_KEY).await?;
            let private_key = self.secret_value(namespace, name, PRIVATE_KEY_KEY).await?;
            // `kubectl create secret --from-file` keeps the trailing newline.
            let account_name = String::from_utf8_lossy(&account_name).trim().to_string();
            (account_name, private_key)
        } else if config.private_key_secret_ref.is_set() {
            let selector = &config.private_key_secret_ref;
            let private_key = self
                .secret_value(default_namespace, &selector.name, &selector.key)
                .await?;
            (config.account_name.clone(), private_key)
        } else {
            (config.account_name.clone(), config.private_key.clone())
        };

        Ok(Credential {
            account_name,
            private_key,
            dry_run: config.dry_run,
        })
    }

    async fn secret_value(&self, namespace: &str, name: &str, key: &str) -> CoreResult<Vec<u8>> {
        let mut data = self
            .store
            .get_secret(namespace, name)
            .await?
            .ok_or_else(|| CoreError::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })?;

        data.remove(key).ok_or_else(|| CoreError::SecretKeyNotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
            key: key.to_string(),
        })
    }
}
