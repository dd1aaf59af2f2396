//! Agent for an externally driven batch of environments.
use crate::{error::RolloutError, Act, Env, RecurrentPolicy, RecurrentState};
use anyhow::Result;
use log::trace;
use std::marker::PhantomData;

/// Wraps a [`RecurrentPolicy`] with the per-slot memory it needs, for loops
/// where the caller steps the environments.
///
/// The caller passes the outputs of the last batched environment step to
/// [`BatchedAgent::batched_step`] and receives the actions of the next one.
pub struct BatchedAgent<E, P>
where
    E: Env,
    P: RecurrentPolicy<E>,
{
    policy: P,
    state: RecurrentState,
    prev_acts: Vec<E::Act>,
    phantom: PhantomData<E>,
}

impl<E, P> BatchedAgent<E, P>
where
    E: Env,
    P: RecurrentPolicy<E>,
{
    /// Constructs an agent for `n_envs` environments.
    pub fn new(policy: P, n_envs: usize) -> Result<Self> {
        let state = policy.initial_state_batch(n_envs)?;
        Ok(Self {
            policy,
            state,
            prev_acts: vec![E::Act::noop(); n_envs],
            phantom: PhantomData,
        })
    }

    /// Returns the number of environments.
    pub fn n_envs(&self) -> usize {
        self.prev_acts.len()
    }

    /// Returns the policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Returns the current recurrent state.
    pub fn state(&self) -> &RecurrentState {
        &self.state
    }

    /// Computes the actions for the next step.
    ///
    /// `obs`, `rewards`, `dones` and `infos` are the outputs of the last environment step.
    /// `dones[i] == true` means `obs[i]` is the first observation of a new episode,
    /// so the state of slot `i` is reset and its previous action and reward are
    /// cleared before the policy is queried.
    pub fn batched_step(
        &mut self,
        obs: &[E::Obs],
        rewards: &[f32],
        dones: &[bool],
        infos: &[E::Info],
    ) -> Result<Vec<E::Act>> {
        let n = self.n_envs();
        for len in [obs.len(), rewards.len(), dones.len(), infos.len()].iter() {
            if *len != n {
                return Err(RolloutError::BatchSizeMismatch {
                    expected: n,
                    got: *len,
                }
                .into());
            }
        }

        let mut prev_rewards = rewards.to_vec();
        for ix in (0..n).filter(|ix| dones[*ix]) {
            trace!("Slot {} done: {:?}", ix, infos[ix]);
            self.state.replace_slot(ix, &self.policy.initial_state())?;
            self.prev_acts[ix] = E::Act::noop();
            prev_rewards[ix] = 0.0;
        }

        let (acts, state) =
            self.policy
                .compute_actions(obs, &self.prev_acts, &prev_rewards, &self.state)?;
        if acts.len() != n {
            return Err(RolloutError::BatchSizeMismatch {
                expected: n,
                got: acts.len(),
            }
            .into());
        }
        self.state = state;
        self.prev_acts = acts.clone();

        Ok(acts)
    }
}
