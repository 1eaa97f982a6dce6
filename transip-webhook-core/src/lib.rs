//! TransIP Webhook Core Library
//!
//! Solver logic for ACME DNS-01 challenges against a TransIP account:
//! - configuration decoding and validation ([`config`])
//! - credential resolution from inline values or Kubernetes secrets ([`credentials`])
//! - authoritative zone and record name resolution ([`zone`])
//! - idempotent TXT entry management ([`services::DnsRecordClient`])
//! - the [`Solver`] contract and its TransIP implementation ([`TransipSolver`])
//!
//! Collaborators (secret store, DNS client factory, zone finder) are traits, so the solver
//! runs unchanged against in-memory fakes.

pub mod adapters;
pub mod config;
pub mod credentials;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod zone;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{load_config, SolverConfig};
pub use error::{CoreError, CoreResult};
pub use services::{TransipSolver, SOLVER_NAME};
pub use traits::{DnsClientFactory, SecretStore, Solver, ZoneFinder};
pub use types::{ChallengeAction, ChallengeRequest};
