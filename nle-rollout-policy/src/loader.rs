//! Restoring trained agents from checkpoints.
use crate::{Algorithm, AlgorithmConfig, Net, NetParams, NetPolicy, ObsPreprocessor};
use anyhow::Result;
use log::{info, warn};
use nle_rollout_core::error::RolloutError;
use nle_rollout_env::NleEnvConfig;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::{
    collections::{BTreeMap, HashMap},
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

/// Identifier of the policy evaluated when none is given.
pub const DEFAULT_POLICY_ID: &str = "default_policy";

/// Name of the configuration file written next to checkpoints.
pub const PARAMS_FILE_NAME: &str = "params.yaml";

/// Contents of a checkpoint file.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Checkpoint {
    /// Name of the algorithm the agent was trained with.
    pub algorithm: String,

    /// Network parameters per policy identifier.
    pub policies: BTreeMap<String, NetParams>,
}

impl Checkpoint {
    /// Writes the checkpoint with `bincode`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let buf = bincode::serialize(self)?;
        fs::write(path, buf)?;
        Ok(())
    }

    /// Reads a checkpoint written with [`Checkpoint::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let buf = fs::read(path)?;
        let checkpoint = bincode::deserialize(&buf[..])
            .map_err(|e| RolloutError::CheckpointRestore(e.to_string()))?;
        Ok(checkpoint)
    }
}

/// Returns the configuration file of a checkpoint.
///
/// The file is looked up in the directory of the checkpoint, then in its parent.
pub fn find_config(checkpoint: &Path) -> Result<PathBuf> {
    let dir = checkpoint.parent().unwrap_or_else(|| Path::new(""));
    let candidates = [Some(dir), dir.parent()];
    for d in candidates.iter().flatten() {
        let path = d.join(PARAMS_FILE_NAME);
        if path.is_file() {
            return Ok(path);
        }
    }
    Err(RolloutError::ConfigNotFound {
        checkpoint: checkpoint.to_path_buf(),
        file_name: PARAMS_FILE_NAME.to_string(),
    }
    .into())
}

/// Merges `over` into `base`.
///
/// Mappings are merged key by key, recursively. Any other value of `over`
/// replaces the one in `base`.
pub fn merge(base: &mut Value, over: Value) {
    match (base, over) {
        (Value::Mapping(base), Value::Mapping(over)) => {
            for (k, v) in over {
                match base.get_mut(&k) {
                    Some(b) => merge(b, v),
                    None => {
                        base.insert(k, v);
                    }
                }
            }
        }
        (base, over) => *base = over,
    }
}

fn set(config: &mut Mapping, key: &str, value: Value) {
    config.insert(Value::from(key), value);
}

fn get<'a>(config: &'a Mapping, key: &str) -> Option<&'a Value> {
    config.get(&Value::from(key))
}

/// Builds the configuration used for evaluation.
///
/// The parameters of training are merged over the default configuration of
/// `algorithm`, then the environment is created on the driver, the
/// `evaluation_config` overrides are applied, evaluation workers default to the
/// training workers and no rollout worker is created.
pub fn build_config(algorithm: Algorithm, params: Value) -> Result<AlgorithmConfig> {
    let mut config = algorithm.default_config()?;
    if !params.is_null() {
        merge(&mut config, params);
    }
    let map = config.as_mapping_mut().ok_or_else(|| {
        RolloutError::InvalidConfig("configuration is not a mapping".to_string())
    })?;

    set(map, "create_env_on_driver", Value::Bool(true));

    if let Some(eval) = get(map, "evaluation_config").cloned() {
        if eval.as_mapping().is_some() {
            let mut merged = Value::Mapping(std::mem::take(map));
            merge(&mut merged, eval);
            if let Value::Mapping(m) = merged {
                *map = m;
            }
        }
    }

    let eval_workers = get(map, "evaluation_num_workers")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if eval_workers == 0 {
        let n = get(map, "num_workers")
            .cloned()
            .unwrap_or_else(|| Value::from(0));
        set(map, "evaluation_num_workers", n);
    }
    set(map, "num_workers", Value::from(0));

    let config: AlgorithmConfig = serde_yaml::from_value(Value::Mapping(map.clone()))
        .map_err(|e| RolloutError::InvalidConfig(e.to_string()))?;
    algorithm.validate(&config)?;
    Ok(config)
}

/// A trained agent restored for evaluation.
pub struct Trainer {
    algorithm: Algorithm,
    config: AlgorithmConfig,
    policies: HashMap<String, NetPolicy>,
}

impl Trainer {
    /// Restores the policies of a checkpoint under a configuration.
    pub fn restore(
        algorithm: Algorithm,
        config: AlgorithmConfig,
        checkpoint: impl AsRef<Path>,
    ) -> Result<Self> {
        let checkpoint = Checkpoint::load(checkpoint)?;
        if checkpoint.algorithm != algorithm.name() {
            return Err(RolloutError::CheckpointRestore(format!(
                "checkpoint of {}, restoring as {}",
                checkpoint.algorithm, algorithm
            ))
            .into());
        }
        if !checkpoint.policies.contains_key(DEFAULT_POLICY_ID) {
            return Err(RolloutError::CheckpointRestore(format!(
                "no policy {}",
                DEFAULT_POLICY_ID
            ))
            .into());
        }

        let mut policies = HashMap::new();
        for (id, params) in checkpoint.policies.into_iter() {
            let preprocessor = ObsPreprocessor::build(&config.preprocessor)?;
            let net = Net::new(params, config.model.clone(), preprocessor.size())
                .map_err(|e| RolloutError::CheckpointRestore(format!("policy {}: {}", id, e)))?;
            info!(
                "Restored policy {} with {} actions, lstm cell size {}",
                id,
                net.num_actions(),
                net.cell_size()
            );
            let policy = NetPolicy::new(net, preprocessor, algorithm.head(), config.explore);
            policies.insert(id, policy);
        }

        Ok(Self {
            algorithm,
            config,
            policies,
        })
    }

    /// Returns the policy of the given identifier.
    pub fn get_policy(&self, id: &str) -> Option<&NetPolicy> {
        self.policies.get(id)
    }

    /// Moves the policy of the given identifier out of the trainer.
    pub fn take_policy(&mut self, id: &str) -> Result<NetPolicy> {
        self.policies
            .remove(id)
            .ok_or_else(|| RolloutError::CheckpointRestore(format!("no policy {}", id)).into())
    }

    /// Returns the preprocessor of observations of the given policy.
    pub fn preprocessor(&self, id: &str) -> Option<&ObsPreprocessor> {
        self.policies.get(id).map(|p| p.preprocessor())
    }

    /// Options of the environment the agent was trained on.
    pub fn env_config(&self) -> &NleEnvConfig {
        &self.config.env_config.flags
    }

    /// Configuration after the evaluation overrides.
    pub fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    /// Algorithm the agent was trained with.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

/// Restores a trained agent for evaluation.
///
/// `checkpoint` is a checkpoint file; its configuration is read from
/// [`PARAMS_FILE_NAME`] next to it or in the parent directory. Nothing is
/// restored if the configuration is missing.
pub fn load_agent(checkpoint: impl AsRef<Path>, algorithm: Algorithm) -> Result<Trainer> {
    let checkpoint = checkpoint.as_ref();
    if !checkpoint.is_file() {
        return Err(RolloutError::CheckpointNotFound(checkpoint.to_path_buf()).into());
    }
    let config_path = find_config(checkpoint)?;
    info!("Load configuration from {:?}", config_path);

    let rdr = BufReader::new(File::open(&config_path)?);
    let params: Value = serde_yaml::from_reader(rdr)
        .map_err(|e| RolloutError::InvalidConfig(format!("{:?}: {}", config_path, e)))?;
    let config = build_config(algorithm, params)?;
    if config.explore {
        warn!("Actions are sampled, set explore: false in evaluation_config to act greedily");
    }

    info!("Restore {} agent from {:?}", algorithm, checkpoint);
    Trainer::restore(algorithm, config, checkpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_merge_nested() {
        let mut base = yaml("a: 1\nm:\n  x: 1\n  y: 2\n");
        merge(&mut base, yaml("b: 2\nm:\n  y: 3\n  z: 4\n"));
        assert_eq!(base, yaml("a: 1\nb: 2\nm:\n  x: 1\n  y: 3\n  z: 4\n"));
    }

    #[test]
    fn test_build_config_order() -> Result<()> {
        let params = yaml(
            r#"
num_workers: 8
create_env_on_driver: false
explore: true
evaluation_config:
  explore: false
  create_env_on_driver: false
  model:
    lstm_cell_size: 64
env_config:
  flags:
    env: staircase
"#,
        );
        let config = build_config(Algorithm::Impala, params)?;
        // evaluation_config is applied after create_env_on_driver is forced.
        assert!(!config.create_env_on_driver);
        assert!(!config.explore);
        assert_eq!(config.model.lstm_cell_size, 64);
        assert_eq!(config.evaluation_num_workers, 8);
        assert_eq!(config.num_workers, 0);
        assert_eq!(config.extra["vtrace"], Value::Bool(true));
        assert_eq!(
            config.env_config.flags.env,
            nle_rollout_env::NleTask::Staircase
        );
        Ok(())
    }

    #[test]
    fn test_build_config_keeps_eval_workers() -> Result<()> {
        let params = yaml("num_workers: 8\nevaluation_num_workers: 3\n");
        let config = build_config(Algorithm::Ppo, params)?;
        assert!(config.create_env_on_driver);
        assert_eq!(config.evaluation_num_workers, 3);
        assert_eq!(config.num_workers, 0);
        Ok(())
    }

    #[test]
    fn test_dqn_rejects_lstm() {
        let params = yaml("model:\n  use_lstm: true\n");
        assert!(build_config(Algorithm::Dqn, params.clone()).is_err());
        assert!(build_config(Algorithm::A2c, params).is_ok());
    }
}
