//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use transip_webhook_provider::ProviderError;

pub use crate::config::ConfigValidationError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Solver config JSON could not be decoded
    #[error("error decoding solver config: {0}")]
    ConfigDecode(String),

    /// Solver config decoded but is not usable
    #[error("error validating solver config: {0}")]
    ConfigValidation(ConfigValidationError),

    /// Referenced secret does not exist (or could not be read)
    #[error("failed to load secret '{namespace}/{name}'")]
    SecretNotFound { namespace: String, name: String },

    /// Referenced secret exists but lacks the key
    #[error("key not found {key:?} in secret '{namespace}/{name}'")]
    SecretKeyNotFound {
        namespace: String,
        name: String,
        key: String,
    },

    /// Secret store backend failure
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// `present` / `cleanup` called before `initialize`
    #[error("solver is not initialized")]
    NotInitialized,

    /// `initialize` called twice
    #[error("solver is already initialized")]
    AlreadyInitialized,

    /// Kubernetes client could not be built
    #[error("Cluster client error: {0}")]
    ClusterClient(String),

    /// No authoritative zone found while walking the name
    #[error("Zone not found for {0}")]
    ZoneNotFound(String),

    /// SOA query failed for a reason other than the name not existing
    #[error("SOA lookup for {name} failed: {detail}")]
    ZoneLookup { name: String, detail: String },

    /// Provider failure with the step that was being performed
    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: ProviderError,
    },

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Wraps a provider error with the step that failed.
    pub fn remote(context: impl Into<String>) -> impl FnOnce(ProviderError) -> Self {
        let context = context.into();
        move |source| Self::Remote { context, source }
    }

    /// Whether it is expected behavior (bad config, missing secret, unknown domain) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ConfigDecode(_)
            | Self::ConfigValidation(_)
            | Self::SecretNotFound { .. }
            | Self::SecretKeyNotFound { .. }
            | Self::ZoneNotFound(_) => true,
            Self::Remote { source, .. } => source.is_expected(),
            Self::Provider(e) => e.is_expected(),
            Self::SecretStore(_)
            | Self::NotInitialized
            | Self::AlreadyInitialized
            | Self::ClusterClient(_)
            | Self::ZoneLookup { .. } => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
