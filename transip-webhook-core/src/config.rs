//! Solver configuration
//!
//! The issuer embeds an opaque JSON object in every challenge request. It is decoded into
//! [`SolverConfig`] and validated before anything else happens:
//!
//! ```json
//! {
//!   "accountName": "my-account",
//!   "privateKeySecretRef": { "name": "transip-credentials", "key": "privateKey" },
//!   "ttl": 300,
//!   "dryRun": false
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{CoreError, CoreResult};

/// Reference to a secret holding both `accountName` and `privateKey`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SecretReference {
    pub name: String,
    /// Empty means the challenge's resource namespace.
    pub namespace: String,
}

impl SecretReference {
    pub fn is_set(&self) -> bool {
        !self.name.is_empty()
    }
}

impl fmt::Display for SecretReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {}}}", self.name, self.namespace)
    }
}

/// Reference to a single key of a secret in the challenge's resource namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SecretKeySelector {
    pub name: String,
    pub key: String,
}

impl SecretKeySelector {
    pub fn is_set(&self) -> bool {
        !self.name.is_empty()
    }
}

impl fmt::Display for SecretKeySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {}}}", self.name, self.key)
    }
}

/// Decoded solver configuration.
///
/// Exactly one credential source may be set: `secret_ref`, `private_key` or
/// `private_key_secret_ref`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverConfig {
    pub secret_ref: SecretReference,
    pub account_name: String,
    /// PEM key bytes; base64 encoded in JSON.
    #[serde(deserialize_with = "base64_bytes::deserialize")]
    pub private_key: Vec<u8>,
    pub private_key_secret_ref: SecretKeySelector,
    /// TTL (`expire`) in seconds of the created TXT entry.
    pub ttl: i64,
    pub dry_run: bool,
}

impl SolverConfig {
    /// Checks the configuration. Rules are applied in a fixed order and the first
    /// violation is reported.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let has_key = !self.private_key.is_empty();
        let has_secret_ref = self.secret_ref.is_set();
        let has_key_secret_ref = self.private_key_secret_ref.is_set();

        if self.account_name.is_empty() {
            return Err(ConfigValidationError::MissingAccountName);
        }
        if !has_secret_ref && !has_key && !has_key_secret_ref {
            return Err(ConfigValidationError::MissingCredentialSource);
        }
        if has_key && has_key_secret_ref {
            return Err(ConfigValidationError::PrivateKeyAndKeySecretRef);
        }
        if has_key && has_secret_ref {
            return Err(ConfigValidationError::PrivateKeyAndSecretRef);
        }
        if has_secret_ref && has_key_secret_ref {
            return Err(ConfigValidationError::SecretRefAndKeySecretRef);
        }
        if self.ttl < 0 {
            return Err(ConfigValidationError::NegativeTtl);
        }
        if u32::try_from(self.ttl).is_err() {
            return Err(ConfigValidationError::TtlOutOfRange(self.ttl));
        }
        Ok(())
    }

    /// TTL as sent to the provider. Zero for out-of-range values, which `validate` rejects.
    pub fn ttl_seconds(&self) -> u32 {
        u32::try_from(self.ttl).unwrap_or_default()
    }
}

impl fmt::Display for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let private_key = if self.private_key.is_empty() {
            "nil"
        } else {
            "<****>"
        };
        write!(
            f,
            "{{secretRef: {}, accountName: {}, privateKey: {private_key}, privateKeySecretRef: {}, ttl: {}, dryRun: {}}}",
            self.secret_ref, self.account_name, self.private_key_secret_ref, self.ttl, self.dry_run
        )
    }
}

impl fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Why a decoded configuration was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfigValidationError {
    #[error("accountName is required")]
    MissingAccountName,

    #[error("secretRef, privateKey or privateKeySecretRef is required")]
    MissingCredentialSource,

    #[error("only one of privateKey or privateKeySecretRef can be set")]
    PrivateKeyAndKeySecretRef,

    #[error("only one of privateKey or secretRef can be set")]
    PrivateKeyAndSecretRef,

    #[error("only one of secretRef or privateKeySecretRef can be set")]
    SecretRefAndKeySecretRef,

    #[error("ttl must be greater than or equal to 0")]
    NegativeTtl,

    #[error("ttl {0} exceeds the maximum of 4294967295")]
    TtlOutOfRange(i64),
}

/// Decodes and validates the configuration of a challenge request.
///
/// An absent (or JSON `null`) configuration yields the default configuration and is
/// not validated; the credential step will fail on it later.
pub fn load_config(raw: Option<&serde_json::Value>) -> CoreResult<SolverConfig> {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Ok(SolverConfig::default());
    };

    let config =
        SolverConfig::deserialize(raw).map_err(|e| CoreError::ConfigDecode(e.to_string()))?;
    config.validate().map_err(CoreError::ConfigValidation)?;
    Ok(config)
}

/// `Vec<u8>` as a standard base64 string, the way Kubernetes encodes `[]byte` fields.
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}
