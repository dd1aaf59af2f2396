//! Configuration of a trained agent.
use crate::{ModelConfig, ObsPreprocessorConfig};
use nle_rollout_env::NleEnvConfig;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// The `env_config` section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvSection {
    /// Options of the environment.
    pub flags: NleEnvConfig,
}

/// Configuration of an agent after the evaluation overrides are applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    /// Number of rollout workers besides the driver.
    pub num_workers: usize,

    /// Number of evaluation workers.
    pub evaluation_num_workers: usize,

    /// Creates an environment on the driver.
    pub create_env_on_driver: bool,

    /// Samples actions instead of acting greedily.
    pub explore: bool,

    /// Environment.
    pub env_config: EnvSection,

    /// Network.
    pub model: ModelConfig,

    /// Model inputs.
    pub preprocessor: ObsPreprocessorConfig,

    /// Other entries, kept as they are.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            num_workers: 0,
            evaluation_num_workers: 0,
            create_env_on_driver: true,
            explore: false,
            env_config: EnvSection::default(),
            model: ModelConfig::default(),
            preprocessor: ObsPreprocessorConfig::default(),
            extra: BTreeMap::new(),
        }
    }
}
