//! Algorithms a checkpoint can be restored for.
use crate::AlgorithmConfig;
use anyhow::Result;
use nle_rollout_core::error::RolloutError;
use serde_yaml::Value;
use std::{fmt, str::FromStr};

/// Kind of the output of a policy network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionHead {
    /// Logits of a categorical distribution.
    Logits,

    /// Action values, acted on greedily.
    QValues,
}

/// Training algorithm of a checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// Importance weighted actor-learner.
    Impala,
    /// Advantage actor-critic.
    A2c,
    /// Deep Q-network.
    Dqn,
    /// Proximal policy optimization.
    Ppo,
}

const COMMON_CONFIG: &str = r#"
num_workers: 2
evaluation_num_workers: 0
create_env_on_driver: false
explore: true
model:
  use_lstm: false
  lstm_cell_size: 256
  lstm_use_prev_action: false
  lstm_use_prev_reward: false
"#;

const IMPALA_CONFIG: &str = r#"
vtrace: true
rollout_fragment_length: 50
train_batch_size: 500
"#;

const A2C_CONFIG: &str = r#"
rollout_fragment_length: 20
microbatch_size: null
"#;

const DQN_CONFIG: &str = r#"
dueling: true
double_q: true
evaluation_config:
  explore: false
"#;

const PPO_CONFIG: &str = r#"
clip_param: 0.3
num_sgd_iter: 30
"#;

impl Algorithm {
    /// Name of the algorithm as written in checkpoints.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Impala => "impala",
            Algorithm::A2c => "a2c",
            Algorithm::Dqn => "dqn",
            Algorithm::Ppo => "ppo",
        }
    }

    /// Kind of the action head.
    pub fn head(&self) -> ActionHead {
        match self {
            Algorithm::Dqn => ActionHead::QValues,
            _ => ActionHead::Logits,
        }
    }

    /// Returns the default configuration of the algorithm.
    pub fn default_config(&self) -> Result<Value> {
        let mut config: Value = serde_yaml::from_str(COMMON_CONFIG)?;
        let specific = match self {
            Algorithm::Impala => IMPALA_CONFIG,
            Algorithm::A2c => A2C_CONFIG,
            Algorithm::Dqn => DQN_CONFIG,
            Algorithm::Ppo => PPO_CONFIG,
        };
        crate::loader::merge(&mut config, serde_yaml::from_str(specific)?);
        Ok(config)
    }

    /// Checks the algorithm supports the configuration.
    pub fn validate(&self, config: &AlgorithmConfig) -> Result<()> {
        if *self == Algorithm::Dqn && config.model.use_lstm {
            return Err(RolloutError::InvalidConfig(
                "dqn does not support recurrent models".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = RolloutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "impala" => Ok(Algorithm::Impala),
            "a2c" => Ok(Algorithm::A2c),
            "dqn" => Ok(Algorithm::Dqn),
            "ppo" => Ok(Algorithm::Ppo),
            _ => Err(RolloutError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("impala".parse::<Algorithm>().unwrap(), Algorithm::Impala);
        assert_eq!("ppo".parse::<Algorithm>().unwrap(), Algorithm::Ppo);
        assert!(matches!(
            "sac".parse::<Algorithm>(),
            Err(RolloutError::UnsupportedAlgorithm(s)) if s == "sac"
        ));
    }

    #[test]
    fn test_default_config() -> Result<()> {
        for algo in [Algorithm::Impala, Algorithm::A2c, Algorithm::Dqn, Algorithm::Ppo].iter() {
            let config = algo.default_config()?;
            assert_eq!(config["num_workers"], Value::from(2));
            assert_eq!(config["model"]["use_lstm"], Value::from(false));
        }
        assert_eq!(
            Algorithm::Dqn.default_config()?["evaluation_config"]["explore"],
            Value::from(false)
        );
        Ok(())
    }

    #[test]
    fn test_head() {
        assert_eq!(Algorithm::Dqn.head(), ActionHead::QValues);
        assert_eq!(Algorithm::Impala.head(), ActionHead::Logits);
    }
}
