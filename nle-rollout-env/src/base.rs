//! Wrapper normalizing observations of a game environment.
use crate::{util::Array, DictObs, NleAct, NleEnvConfig};
use anyhow::Result;
use log::{debug, trace};
use nle_rollout_core::{error::RolloutError, Env, Info, Step};
use std::collections::HashMap;

/// Information given at every step of the game.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NleInfo {
    /// How the step ended, e.g., `RUNNING` or `DEATH`.
    pub end_status: Option<String>,

    /// `true` if the character ascended.
    pub is_ascended: bool,
}

impl Info for NleInfo {
    fn end_status(&self) -> Option<String> {
        self.end_status.clone()
    }
}

/// Outputs of [`DictEnv::step`].
pub struct RawStep {
    /// Observation channels, in the order of the game.
    pub obs: Vec<(String, Array)>,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode ended.
    pub is_done: bool,

    /// Information.
    pub info: NleInfo,
}

/// A game environment emitting observations as named channels.
///
/// Channels may come in any order; [`NleEnv`] puts them in a stable order.
pub trait DictEnv {
    /// Creates the environment.
    fn create(config: &NleEnvConfig, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Names of the observation channels the environment declares.
    fn observation_keys(&self) -> Vec<String>;

    /// The number of discrete actions.
    fn num_actions(&self) -> usize;

    /// Resets the game.
    fn reset(&mut self) -> Result<Vec<(String, Array)>>;

    /// Performs an action.
    fn step(&mut self, action: i64) -> Result<RawStep>;
}

/// A [`DictEnv`] whose observations iterate in sorted channel order.
///
/// The sorted list of declared channels is taken once at construction and
/// used for every observation afterwards, so downstream consumers see the same
/// positional layout whatever order the game uses internally.
pub struct NleEnv<R: DictEnv> {
    env: R,
    obs_keys: Vec<String>,
}

impl<R: DictEnv> NleEnv<R> {
    /// Wraps an environment.
    pub fn new(env: R) -> Self {
        let mut obs_keys = env.observation_keys();
        obs_keys.sort();
        obs_keys.dedup();
        debug!("Observation keys: {:?}", obs_keys);
        Self { env, obs_keys }
    }

    /// Sorted names of the observation channels.
    pub fn observation_keys(&self) -> &[String] {
        &self.obs_keys
    }

    /// The number of discrete actions of the wrapped environment.
    pub fn num_actions(&self) -> usize {
        self.env.num_actions()
    }

    /// Returns the wrapped environment.
    pub fn inner(&self) -> &R {
        &self.env
    }

    /// Rebuilds an observation with the declared channels in sorted order.
    ///
    /// Channels not declared by the environment are dropped.
    fn process_obs(&self, obs: Vec<(String, Array)>) -> Result<DictObs> {
        let mut obs: HashMap<String, Array> = obs.into_iter().collect();
        let entries = self
            .obs_keys
            .iter()
            .map(|key| match obs.remove(key) {
                Some(v) => Ok((key.clone(), v)),
                None => Err(RolloutError::MissingObsKey(key.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries.into())
    }
}

impl<R: DictEnv> Env for NleEnv<R> {
    type Config = NleEnvConfig;
    type Obs = DictObs;
    type Act = NleAct;
    type Info = NleInfo;

    /// Checks the configuration and creates the wrapped environment.
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        config.check()?;
        let env = R::create(config, seed)?;
        Ok(Self::new(env))
    }

    fn reset(&mut self) -> Result<DictObs> {
        trace!("NleEnv::reset()");
        let obs = self.env.reset()?;
        self.process_obs(obs)
    }

    fn step(&mut self, a: &NleAct) -> Result<Step<Self>> {
        trace!("NleEnv::step({:?})", a);
        let RawStep {
            obs,
            reward,
            is_done,
            info,
        } = self.env.step(a.0)?;
        let obs = self.process_obs(obs)?;
        Ok(Step::new(obs, *a, reward, is_done, info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, ArrayD};

    /// Emits channels in a fixed, unsorted order.
    struct ShuffledEnv {
        keys: Vec<String>,
        t: u8,
        episode_len: u8,
        drop_key: Option<String>,
    }

    impl ShuffledEnv {
        fn obs(&self) -> Vec<(String, Array)> {
            self.keys
                .iter()
                .enumerate()
                .filter(|(_, k)| Some(*k) != self.drop_key.as_ref())
                .map(|(i, k)| {
                    let a: ArrayD<u8> = arr1(&[i as u8, self.t]).into_dyn();
                    (k.clone(), a.into())
                })
                .collect()
        }
    }

    impl DictEnv for ShuffledEnv {
        fn create(config: &NleEnvConfig, _seed: i64) -> Result<Self> {
            Ok(Self {
                keys: config.observation_keys.clone(),
                t: 0,
                episode_len: 2,
                drop_key: None,
            })
        }

        fn observation_keys(&self) -> Vec<String> {
            self.keys.clone()
        }

        fn num_actions(&self) -> usize {
            23
        }

        fn reset(&mut self) -> Result<Vec<(String, Array)>> {
            self.t = 0;
            Ok(self.obs())
        }

        fn step(&mut self, _action: i64) -> Result<RawStep> {
            self.t += 1;
            Ok(RawStep {
                obs: self.obs(),
                reward: 1.0,
                is_done: self.t >= self.episode_len,
                info: NleInfo::default(),
            })
        }
    }

    fn config() -> NleEnvConfig {
        let mut config = NleEnvConfig::default();
        config.observation_keys = ["tty_chars", "blstats", "message", "glyphs"]
            .iter()
            .map(|k| k.to_string())
            .collect();
        config
    }

    #[test]
    fn test_obs_keys_sorted() -> Result<()> {
        let mut env = NleEnv::<ShuffledEnv>::build(&config(), 0)?;
        assert_eq!(env.num_actions(), 23);

        let obs = env.reset()?;
        assert!(obs.is_sorted());
        assert_eq!(
            obs.keys().collect::<Vec<_>>(),
            vec!["blstats", "glyphs", "message", "tty_chars"]
        );

        let step = env.step(&NleAct(3))?;
        assert!(step.obs.is_sorted());
        assert_eq!(step.obs.len(), 4);
        Ok(())
    }

    #[test]
    fn test_values_unchanged() -> Result<()> {
        let mut env = NleEnv::<ShuffledEnv>::build(&config(), 0)?;
        let raw = env.inner().obs();
        let obs = env.reset()?;
        for (k, v) in raw.iter() {
            assert_eq!(obs.get(k), Some(v));
        }
        // Sorting an already normalized observation changes nothing.
        assert_eq!(obs.clone().sorted(), obs);
        Ok(())
    }

    #[test]
    fn test_missing_key() -> Result<()> {
        let mut env = NleEnv::<ShuffledEnv>::build(&config(), 0)?;
        env.env.drop_key = Some("message".to_string());
        let err = env.reset().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RolloutError>(),
            Some(RolloutError::MissingObsKey(k)) if k == "message"
        ));
        Ok(())
    }

    #[test]
    fn test_build_checks_config() {
        let config = config().seedspath(Some("seeds".to_string()));
        assert!(NleEnv::<ShuffledEnv>::build(&config, 0).is_err());
    }
}
