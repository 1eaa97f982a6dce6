//! Production implementations of the collaborator traits

mod kube_secret_store;
mod transip_client_factory;

pub use kube_secret_store::KubeSecretStore;
pub use transip_client_factory::TransipClientFactory;
