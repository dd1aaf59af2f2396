//! Policies of trained NetHack agents, without a deep learning backend.
//!
//! [`load_agent`] restores a [`Trainer`] from a checkpoint and the `params.yaml`
//! configuration saved with it. The configuration of training is turned into
//! one for evaluation: the environment is created on the driver, the
//! `evaluation_config` overrides are applied and no rollout worker is created.
//!
//! Networks are made of an MLP encoder, an optional LSTM and an action head,
//! evaluated with the plain matrix type [`Mat`]. Checkpoints are serialized
//! with `bincode`.
//!
//! ```no_run
//! use nle_rollout_policy::{load_agent, Algorithm, DEFAULT_POLICY_ID};
//! # fn main() -> anyhow::Result<()> {
//! let mut trainer = load_agent("run/checkpoint_000100/checkpoint-100", Algorithm::Impala)?;
//! let policy = trainer.take_policy(DEFAULT_POLICY_ID)?;
//! # Ok(())
//! # }
//! ```
mod algorithm;
mod config;
mod loader;
mod lstm;
mod mat;
mod mlp;
mod model;
mod policy;
mod preprocessor;
pub use algorithm::{ActionHead, Algorithm};
pub use config::{AlgorithmConfig, EnvSection};
pub use loader::{
    build_config, find_config, load_agent, merge, Checkpoint, Trainer, DEFAULT_POLICY_ID,
    PARAMS_FILE_NAME,
};
pub use lstm::LstmCell;
pub use mat::Mat;
pub use mlp::Mlp;
pub use model::{ModelConfig, Net, NetParams};
pub use policy::NetPolicy;
pub use preprocessor::{ChannelConfig, ObsPreprocessor, ObsPreprocessorConfig};
