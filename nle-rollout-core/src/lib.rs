#![warn(missing_docs)]
//! Core of batched rollout evaluation.
//!
//! This crate provides the traits an environment ([`Env`]) and a recurrent policy
//! ([`RecurrentPolicy`]) implement, a fixed-size batch of environments stepped in
//! lockstep ([`EnvBatch`]), the recurrent state of a batch of episodes
//! ([`RecurrentState`]), and the driver running a policy on a batch until a number
//! of episodes complete ([`BatchedRollout`]).
pub mod dummy;
pub mod error;
pub mod record;

mod agent;
mod base;
mod env_batch;
mod guard;
mod rollout;
mod state;

pub use agent::BatchedAgent;
pub use base::{Act, Env, Info, Obs, RecurrentPolicy, Step};
pub use env_batch::{BatchStep, EnvBatch};
pub use guard::EnvBuildGuard;
pub use rollout::{BatchedRollout, RolloutConfig, RolloutStats};
pub use state::RecurrentState;
