//! Policy running a restored network.
use crate::{ActionHead, Mat, Net, ObsPreprocessor};
use anyhow::Result;
use log::trace;
use ndarray::Array1;
use nle_rollout_core::{Env, RecurrentPolicy, RecurrentState};
use nle_rollout_env::{DictObs, NleAct};

/// A policy computing actions with a network restored from a checkpoint.
///
/// Actions are the argmax of the head outputs, or samples of the softmax of
/// the logits when exploring. Sampling uses the global generator of `fastrand`.
///
/// With an LSTM, the recurrent state has two components, `h` and `c`, each of
/// the cell size. Without it, the state is empty.
pub struct NetPolicy {
    net: Net,
    preprocessor: ObsPreprocessor,
    head: ActionHead,
    explore: bool,
}

impl NetPolicy {
    pub(crate) fn new(
        net: Net,
        preprocessor: ObsPreprocessor,
        head: ActionHead,
        explore: bool,
    ) -> Self {
        Self {
            net,
            preprocessor,
            head,
            explore,
        }
    }

    /// Number of actions.
    pub fn num_actions(&self) -> usize {
        self.net.num_actions()
    }

    /// Returns the preprocessor of observations.
    pub fn preprocessor(&self) -> &ObsPreprocessor {
        &self.preprocessor
    }

    /// Returns `true` if actions are sampled.
    pub fn explore(&self) -> bool {
        self.explore
    }

    fn select(&self, out: &[f32]) -> i64 {
        match (self.head, self.explore) {
            (ActionHead::Logits, true) => sample_softmax(out, fastrand::f32()),
            _ => argmax(out),
        }
    }
}

fn argmax(v: &[f32]) -> i64 {
    let mut best = 0;
    for (i, x) in v.iter().enumerate() {
        if *x > v[best] {
            best = i;
        }
    }
    best as i64
}

/// Samples an index from the softmax of `logits` with a uniform draw `u` in `[0, 1)`.
fn sample_softmax(logits: &[f32], u: f32) -> i64 {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let ps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f32 = ps.iter().sum();
    let mut acc = 0f32;
    for (i, p) in ps.iter().enumerate() {
        acc += p / total;
        if u < acc {
            return i as i64;
        }
    }
    logits.len() as i64 - 1
}

impl<E> RecurrentPolicy<E> for NetPolicy
where
    E: Env<Obs = DictObs, Act = NleAct>,
{
    fn initial_state(&self) -> Vec<Array1<f32>> {
        match self.net.cell_size() {
            0 => vec![],
            h => vec![Array1::zeros(h), Array1::zeros(h)],
        }
    }

    fn compute_actions(
        &mut self,
        obs: &[DictObs],
        prev_acts: &[NleAct],
        prev_rewards: &[f32],
        state: &RecurrentState,
    ) -> Result<(Vec<NleAct>, RecurrentState)> {
        trace!("NetPolicy::compute_actions(n = {})", obs.len());
        let x = obs
            .iter()
            .map(|o| self.preprocessor.transform(o))
            .collect::<Result<Vec<_>>>()?;
        let x = Mat::from_columns(&x);
        let prev_acts: Vec<i64> = prev_acts.iter().map(|a| a.0).collect();

        let (out, state) = match state.components() {
            [h, c] => {
                let (h, c) = (Mat::from_rows_of(h), Mat::from_rows_of(c));
                let (out, hc) = self
                    .net
                    .forward(&x, &prev_acts, prev_rewards, Some((&h, &c)));
                let components = match hc {
                    Some((h, c)) => vec![h.to_rows(), c.to_rows()],
                    None => vec![],
                };
                (out, RecurrentState::new(obs.len(), components)?)
            }
            _ => {
                let (out, _) = self.net.forward(&x, &prev_acts, prev_rewards, None);
                (out, state.clone())
            }
        };

        let acts = (0..out.cols())
            .map(|j| NleAct(self.select(&out.column(j))))
            .collect();
        Ok((acts, state))
    }
}
