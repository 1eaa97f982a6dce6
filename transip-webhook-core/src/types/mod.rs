//! Type definitions

mod challenge;

pub use challenge::{ChallengeAction, ChallengeRequest};
