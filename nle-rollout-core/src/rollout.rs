//! Batched rollout of a recurrent policy.
mod config;
mod stats;
pub use config::RolloutConfig;
pub use stats::RolloutStats;

use crate::{
    error::RolloutError,
    record::{Record, RecordValue, Recorder},
    Act, Env, EnvBatch, Info, RecurrentPolicy, RecurrentState,
};
use anyhow::Result;
use chrono::Local;
use log::info;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs a policy on a batch of environments until a number of episodes complete.
///
/// All environments are stepped in lockstep with one action each. The driver
/// keeps, per slot, the previous action, the previous reward and the recurrent
/// state fed to the policy.
///
/// ```mermaid
/// graph LR
///     Policy -->|actions, new state| EnvBatch
///     EnvBatch -->|obs, rewards, dones| Driver
///     Driver -->|reset done slots| State
///     State --> Policy
/// ```
///
/// When the episode of a slot ends, the state of that slot in the policy's
/// returned state is overwritten with a fresh initial state, its previous action
/// becomes [`Act::noop`] and its previous reward zero. The overwrite is applied
/// after inference, so the policy's proposal for the finished episode never leaks
/// into the next one. Other slots carry the action and reward of this step forward.
///
/// Completions are counted up to [`RolloutConfig::num_assessments`]. Episodes that
/// end in the same step as the last counted one are reset like any other but not
/// recorded.
pub struct BatchedRollout<E, P>
where
    E: Env,
    P: RecurrentPolicy<E>,
{
    config: RolloutConfig,
    policy: P,
    envs: EnvBatch<E>,
}

impl<E, P> BatchedRollout<E, P>
where
    E: Env,
    P: RecurrentPolicy<E>,
{
    /// Constructs the driver.
    pub fn new(config: RolloutConfig, policy: P, envs: EnvBatch<E>) -> Result<Self> {
        if config.num_assessments == 0 {
            return Err(RolloutError::InvalidArgument(
                "the number of assessments must be positive".to_string(),
            )
            .into());
        }
        Ok(Self {
            config,
            policy,
            envs,
        })
    }

    /// Returns the policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Returns the environment batch.
    pub fn envs(&self) -> &EnvBatch<E> {
        &self.envs
    }

    /// Runs the rollout.
    ///
    /// Each completed episode is logged and written to `recorder` with keys
    /// `episode`, `slot`, `length`, `return`, `end_status` and `datetime`.
    /// Errors of the policy or an environment abort the rollout.
    pub fn run<R: Recorder>(&mut self, recorder: &mut R) -> Result<RolloutStats> {
        let n = self.envs.len();
        let target = self.config.num_assessments;

        let mut obs = self.envs.reset()?;
        let mut prev_acts = vec![E::Act::noop(); n];
        let mut prev_rewards = vec![0f32; n];
        let mut state = self.policy.initial_state_batch(n)?;
        let mut ep_returns = vec![0f32; n];
        let mut ep_lens = vec![0usize; n];
        let mut stats = RolloutStats::default();

        info!("Starting evaluation");
        while stats.n_episodes() < target {
            let (acts, mut new_state) =
                self.policy
                    .compute_actions(&obs, &prev_acts, &prev_rewards, &state)?;
            check_policy_output(n, &acts, &new_state, &state)?;

            let step = self.envs.step(&acts)?;
            stats.n_steps += 1;
            if self.config.print_steps {
                info!(
                    "Step done: {:?}, {:?}, {:?}, {:?}",
                    acts, step.reward, step.is_done, step.info
                );
            }

            for ix in 0..n {
                ep_returns[ix] += step.reward[ix];
                ep_lens[ix] += 1;

                if !step.is_done[ix] {
                    prev_acts[ix] = acts[ix].clone();
                    prev_rewards[ix] = step.reward[ix];
                    continue;
                }

                new_state.replace_slot(ix, &self.policy.initial_state())?;
                prev_acts[ix] = E::Act::noop();
                prev_rewards[ix] = 0.0;

                if stats.n_episodes() < target {
                    info!(
                        "Episode complete: {:?}, {}, {}, {}",
                        step.info[ix],
                        stats.n_episodes(),
                        ep_lens[ix],
                        ep_returns[ix]
                    );
                    recorder.write(episode_record(
                        stats.n_episodes(),
                        ix,
                        ep_lens[ix],
                        ep_returns[ix],
                        step.info[ix].end_status().unwrap_or_default(),
                    ));
                    stats.push(ep_returns[ix], ep_lens[ix]);
                }
                ep_returns[ix] = 0.0;
                ep_lens[ix] = 0;
            }

            state = new_state;
            obs = step.obs;
        }

        if let (Some(r), Some(l)) = (stats.mean_return(), stats.mean_length()) {
            info!(
                "Evaluation done: {} episodes, {} steps, mean return = {}, mean length = {}",
                stats.n_episodes(),
                stats.n_steps,
                r,
                l
            );
        }
        Ok(stats)
    }
}

fn check_policy_output<A>(
    n: usize,
    acts: &[A],
    new_state: &RecurrentState,
    state: &RecurrentState,
) -> Result<()> {
    if acts.len() != n {
        return Err(RolloutError::BatchSizeMismatch {
            expected: n,
            got: acts.len(),
        }
        .into());
    }
    if new_state.batch_size() != n {
        return Err(RolloutError::BatchSizeMismatch {
            expected: n,
            got: new_state.batch_size(),
        }
        .into());
    }
    if new_state.n_components() != state.n_components() {
        return Err(RolloutError::InvalidArgument(format!(
            "policy returned {} state components, expected {}",
            new_state.n_components(),
            state.n_components()
        ))
        .into());
    }
    Ok(())
}

fn episode_record(
    episode: usize,
    slot: usize,
    len: usize,
    ret: f32,
    end_status: String,
) -> Record {
    let mut record = Record::empty();
    record.insert("episode", RecordValue::Scalar(episode as f32));
    record.insert("slot", RecordValue::Scalar(slot as f32));
    record.insert("length", RecordValue::Scalar(len as f32));
    record.insert("return", RecordValue::Scalar(ret));
    record.insert("end_status", RecordValue::String(end_status));
    record.insert("datetime", RecordValue::DateTime(Local::now()));
    record
}
