//! 业务逻辑服务层

mod record_client;
mod solver;

pub use record_client::DnsRecordClient;
pub use solver::{TransipSolver, TransipSolverBuilder, SOLVER_NAME};
