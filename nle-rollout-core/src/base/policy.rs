//! Policy.
use super::Env;
use crate::RecurrentState;
use anyhow::Result;
use ndarray::Array1;

/// A policy carrying recurrent state over the steps of an episode.
///
/// The policy maps a batch of observations, together with the previous actions,
/// previous rewards and the recurrent state of every slot, to a batch of actions
/// and the recurrent state for the next step. Policies without memory return an
/// empty initial state.
pub trait RecurrentPolicy<E: Env> {
    /// Returns a freshly allocated initial state of a single episode,
    /// one array per state component.
    ///
    /// Every call must return an independent value.
    fn initial_state(&self) -> Vec<Array1<f32>>;

    /// Computes actions for a batch of observations.
    ///
    /// All slices have the length of the batch and `state.batch_size()` equals it.
    /// The returned state must have the same shape as `state`.
    fn compute_actions(
        &mut self,
        obs: &[E::Obs],
        prev_acts: &[E::Act],
        prev_rewards: &[f32],
        state: &RecurrentState,
    ) -> Result<(Vec<E::Act>, RecurrentState)>;

    /// Stacks `n` independent samples of [`RecurrentPolicy::initial_state`].
    fn initial_state_batch(&self, n: usize) -> Result<RecurrentState> {
        let samples = (0..n).map(|_| self.initial_state()).collect();
        RecurrentState::from_samples(samples)
    }
}
