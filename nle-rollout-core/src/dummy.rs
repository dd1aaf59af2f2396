//! Deterministic environment and policy used in tests.
use crate::{Act, Env, Info, Obs, RecurrentPolicy, RecurrentState, Step};
use anyhow::{anyhow, Result};
use ndarray::Array1;

/// Dummy observation.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyObs {
    /// Seed the environment was built with.
    pub env_id: i64,

    /// Number of resets of the environment so far.
    pub episode: usize,

    /// Steps since the last reset.
    pub t: usize,
}

impl Obs for DummyObs {}

/// Dummy action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DummyAct(pub i64);

impl Act for DummyAct {
    fn noop() -> Self {
        DummyAct(0)
    }
}

/// Dummy info.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyInfo {
    /// Seed the environment was built with.
    pub env_id: i64,

    /// `DONE` on the last step of an episode.
    pub end_status: Option<String>,
}

impl Info for DummyInfo {
    fn end_status(&self) -> Option<String> {
        self.end_status.clone()
    }
}

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug)]
pub struct DummyEnvConfig {
    /// Episode length of the environment built with seed 0.
    pub episode_len: usize,

    /// The environment built with seed `s` has episodes of
    /// `episode_len + s * len_stride` steps.
    pub len_stride: usize,

    /// Reward of every step.
    pub step_reward: f32,

    /// Reward added on the last step of an episode.
    pub final_reward: f32,

    /// Building an environment with this seed fails.
    pub fail_on_seed: Option<i64>,
}

impl Default for DummyEnvConfig {
    fn default() -> Self {
        Self {
            episode_len: 3,
            len_stride: 0,
            step_reward: 0.0,
            final_reward: 1.0,
            fail_on_seed: None,
        }
    }
}

/// An environment whose episodes end after a fixed number of steps.
pub struct DummyEnv {
    env_id: i64,
    episode_len: usize,
    step_reward: f32,
    final_reward: f32,
    episode: usize,
    t: usize,
    /// Actions received, in order.
    pub acts: Vec<i64>,
}

impl DummyEnv {
    fn obs(&self) -> DummyObs {
        DummyObs {
            env_id: self.env_id,
            episode: self.episode,
            t: self.t,
        }
    }
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Obs = DummyObs;
    type Act = DummyAct;
    type Info = DummyInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.fail_on_seed == Some(seed) {
            return Err(anyhow!("failed to build environment with seed {}", seed));
        }
        Ok(Self {
            env_id: seed,
            episode_len: config.episode_len + seed as usize * config.len_stride,
            step_reward: config.step_reward,
            final_reward: config.final_reward,
            episode: 0,
            t: 0,
            acts: vec![],
        })
    }

    fn reset(&mut self) -> Result<DummyObs> {
        self.episode += 1;
        self.t = 0;
        Ok(self.obs())
    }

    fn step(&mut self, a: &DummyAct) -> Result<Step<Self>> {
        self.acts.push(a.0);
        self.t += 1;
        let is_done = self.t >= self.episode_len;
        let reward = match is_done {
            true => self.step_reward + self.final_reward,
            false => self.step_reward,
        };
        let info = DummyInfo {
            env_id: self.env_id,
            end_status: match is_done {
                true => Some("DONE".to_string()),
                false => None,
            },
        };
        Ok(Step::new(self.obs(), *a, reward, is_done, info))
    }
}

/// Inputs of a call of [`DummyPolicy::compute_actions`].
#[derive(Clone, Debug)]
pub struct DummyPolicyCall {
    /// Observations.
    pub obs: Vec<DummyObs>,

    /// Previous actions.
    pub prev_acts: Vec<i64>,

    /// Previous rewards.
    pub prev_rewards: Vec<f32>,

    /// State.
    pub state: RecurrentState,
}

/// A policy counting the steps of each episode in its recurrent state.
///
/// The state has two components: a step counter of size 1, starting at 0, and
/// a marker of size 2, starting at -1 and incremented with the counter.
/// The action of a slot is the counter value before the step plus one,
/// so it is never the no-op action.
#[derive(Default)]
pub struct DummyPolicy {
    /// All calls, in order.
    pub calls: Vec<DummyPolicyCall>,
}

impl RecurrentPolicy<DummyEnv> for DummyPolicy {
    fn initial_state(&self) -> Vec<Array1<f32>> {
        vec![Array1::zeros(1), Array1::from_elem(2, -1.0)]
    }

    fn compute_actions(
        &mut self,
        obs: &[DummyObs],
        prev_acts: &[DummyAct],
        prev_rewards: &[f32],
        state: &RecurrentState,
    ) -> Result<(Vec<DummyAct>, RecurrentState)> {
        self.calls.push(DummyPolicyCall {
            obs: obs.to_vec(),
            prev_acts: prev_acts.iter().map(|a| a.0).collect(),
            prev_rewards: prev_rewards.to_vec(),
            state: state.clone(),
        });

        let counter = &state.components()[0];
        let marker = &state.components()[1];
        let acts = counter
            .column(0)
            .iter()
            .map(|c| DummyAct(*c as i64 + 1))
            .collect();
        let new_state = RecurrentState::new(
            state.batch_size(),
            vec![
                counter.mapv(|v| v + 1.0),
                marker.mapv(|v| v + 1.0),
            ],
        )?;
        Ok((acts, new_state))
    }
}
