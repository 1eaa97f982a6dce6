//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod transip;

pub use transip::{TRANSIP_API_BASE, TransipClient, TransipClientBuilder};
