//! A fixed-size batch of environments stepped in lockstep.
use crate::{error::RolloutError, Env, EnvBuildGuard};
use anyhow::Result;
use log::{info, trace};

/// Outputs of [`EnvBatch::step`], aligned by slot index.
pub struct BatchStep<E: Env> {
    /// Observations. For a slot whose episode ended, this is the observation
    /// after resetting that environment.
    pub obs: Vec<E::Obs>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Flags denoting if the episode of the slot ended in this step.
    pub is_done: Vec<bool>,

    /// Information of each environment.
    pub info: Vec<E::Info>,
}

/// A fixed-size collection of independent environments.
///
/// The number of environments is fixed at construction. An environment whose
/// episode ends is reset in place, never replaced.
pub struct EnvBatch<E: Env> {
    envs: Vec<E>,
}

impl<E: Env> EnvBatch<E> {
    /// Builds `n` environments under `guard`.
    ///
    /// The environment of slot `i` is built with seed `seed + i`.
    /// Any construction failure is returned as is.
    pub fn build(config: &E::Config, n: usize, seed: i64, guard: &EnvBuildGuard) -> Result<Self> {
        if n == 0 {
            return Err(RolloutError::InvalidArgument("batch size must be positive".to_string()).into());
        }
        info!("Creating {} environments", n);
        let envs = (0..n)
            .map(|i| {
                let seed = seed.checked_add(i as i64).ok_or_else(|| {
                    RolloutError::InvalidArgument(format!("seed {} + {} overflows", seed, i))
                })?;
                guard.build::<E>(config, seed)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { envs })
    }

    /// Returns the number of environments.
    pub fn len(&self) -> usize {
        self.envs.len()
    }

    /// Returns the environments.
    pub fn envs(&self) -> &[E] {
        &self.envs
    }

    /// Resets all environments and returns their observations.
    pub fn reset(&mut self) -> Result<Vec<E::Obs>> {
        trace!("EnvBatch::reset()");
        self.envs.iter_mut().map(|env| env.reset()).collect()
    }

    /// Steps every environment with its action.
    ///
    /// An environment whose episode ends is reset immediately and its reset
    /// observation is returned in place of the terminal one.
    pub fn step(&mut self, acts: &[E::Act]) -> Result<BatchStep<E>> {
        if acts.len() != self.envs.len() {
            return Err(RolloutError::BatchSizeMismatch {
                expected: self.envs.len(),
                got: acts.len(),
            }
            .into());
        }
        trace!("EnvBatch::step()");

        let n = self.envs.len();
        let mut obs = Vec::with_capacity(n);
        let mut reward = Vec::with_capacity(n);
        let mut is_done = Vec::with_capacity(n);
        let mut info = Vec::with_capacity(n);

        for (env, a) in self.envs.iter_mut().zip(acts.iter()) {
            let step = env.step_with_reset(a)?;
            reward.push(step.reward);
            is_done.push(step.is_done);
            info.push(step.info.clone());
            obs.push(step.next_obs());
        }

        Ok(BatchStep {
            obs,
            reward,
            is_done,
            info,
        })
    }
}
