//! Collaborator abstraction trait definitions

mod client_factory;
mod secret_store;
mod solver;
mod zone_finder;

pub use client_factory::DnsClientFactory;
pub use secret_store::{SecretData, SecretStore};
pub use solver::Solver;
pub use zone_finder::ZoneFinder;
