//! Recurrent state of a batch of episodes.
use crate::error::RolloutError;
use anyhow::Result;
use ndarray::{stack, Array1, Array2, ArrayView1, Axis};

/// Recurrent state of a batch of episodes.
///
/// The state is a sequence of components, each a 2-dimensional array whose
/// first axis is the slot (environment) index. The row `ix` of every component
/// together forms the state of slot `ix`.
///
/// The batch size is kept apart from the components so that a state without
/// any component (a policy without memory) still knows how many slots it has.
#[derive(Clone, Debug, PartialEq)]
pub struct RecurrentState {
    batch_size: usize,
    components: Vec<Array2<f32>>,
}

impl RecurrentState {
    /// Constructs a state from components.
    ///
    /// Fails if a component does not have `batch_size` rows.
    pub fn new(batch_size: usize, components: Vec<Array2<f32>>) -> Result<Self> {
        for c in components.iter() {
            if c.nrows() != batch_size {
                return Err(RolloutError::BatchSizeMismatch {
                    expected: batch_size,
                    got: c.nrows(),
                }
                .into());
            }
        }
        Ok(Self {
            batch_size,
            components,
        })
    }

    /// Stacks per-slot samples into a batched state.
    ///
    /// `samples[i][k]` is the `k`-th component of slot `i`. Each sample is copied
    /// into its own row, so no two slots share storage.
    pub fn from_samples(samples: Vec<Vec<Array1<f32>>>) -> Result<Self> {
        let batch_size = samples.len();
        if batch_size == 0 {
            return Err(RolloutError::InvalidArgument("empty batch of states".to_string()).into());
        }
        let n_components = samples[0].len();
        if let Some(s) = samples.iter().find(|s| s.len() != n_components) {
            return Err(RolloutError::InvalidArgument(format!(
                "state samples have {} and {} components",
                n_components,
                s.len()
            ))
            .into());
        }

        let mut components = Vec::with_capacity(n_components);
        for k in 0..n_components {
            let rows: Vec<ArrayView1<f32>> = samples.iter().map(|s| s[k].view()).collect();
            let c = stack(Axis(0), &rows).map_err(|e| {
                RolloutError::InvalidArgument(format!("state component {}: {}", k, e))
            })?;
            components.push(c);
        }

        Self::new(batch_size, components)
    }

    /// Returns the number of slots.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the number of state components.
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    /// Returns the components.
    pub fn components(&self) -> &[Array2<f32>] {
        &self.components
    }

    /// Returns an owned copy of the state of slot `ix`.
    pub fn slot(&self, ix: usize) -> Result<Vec<Array1<f32>>> {
        self.check_slot(ix)?;
        Ok(self
            .components
            .iter()
            .map(|c| c.row(ix).to_owned())
            .collect())
    }

    /// Overwrites the state of slot `ix` with `sample`.
    ///
    /// The sample is checked against every component before anything is written,
    /// so on error the state is left unchanged. Rows of other slots are never touched.
    pub fn replace_slot(&mut self, ix: usize, sample: &[Array1<f32>]) -> Result<()> {
        self.check_slot(ix)?;
        if sample.len() != self.components.len() {
            return Err(RolloutError::InvalidArgument(format!(
                "state has {} components, sample has {}",
                self.components.len(),
                sample.len()
            ))
            .into());
        }
        for (k, (c, s)) in self.components.iter().zip(sample.iter()).enumerate() {
            if c.ncols() != s.len() {
                return Err(RolloutError::InvalidArgument(format!(
                    "state component {} has size {}, sample has {}",
                    k,
                    c.ncols(),
                    s.len()
                ))
                .into());
            }
        }

        for (c, s) in self.components.iter_mut().zip(sample.iter()) {
            c.row_mut(ix).assign(s);
        }
        Ok(())
    }

    fn check_slot(&self, ix: usize) -> Result<()> {
        if ix >= self.batch_size {
            return Err(RolloutError::InvalidArgument(format!(
                "slot {} out of range for batch size {}",
                ix, self.batch_size
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn sample(v: f32) -> Vec<Array1<f32>> {
        vec![arr1(&[v, v]), arr1(&[v, v, v])]
    }

    #[test]
    fn test_from_samples_shape() -> Result<()> {
        let state = RecurrentState::from_samples(vec![sample(0.0), sample(1.0), sample(2.0)])?;
        assert_eq!(state.batch_size(), 3);
        assert_eq!(state.n_components(), 2);
        assert_eq!(state.components()[0].shape(), &[3, 2]);
        assert_eq!(state.components()[1].shape(), &[3, 3]);
        assert_eq!(state.slot(2)?, sample(2.0));
        Ok(())
    }

    #[test]
    fn test_replace_slot_leaves_other_slots() -> Result<()> {
        let mut state = RecurrentState::from_samples(vec![sample(1.0), sample(2.0), sample(3.0)])?;
        state.replace_slot(1, &sample(-7.0))?;
        assert_eq!(state.slot(0)?, sample(1.0));
        assert_eq!(state.slot(1)?, sample(-7.0));
        assert_eq!(state.slot(2)?, sample(3.0));
        Ok(())
    }

    #[test]
    fn test_replace_slot_rejects_bad_sample() -> Result<()> {
        let mut state = RecurrentState::from_samples(vec![sample(1.0), sample(2.0)])?;
        let before = state.clone();
        let bad = vec![arr1(&[9.0, 9.0]), arr1(&[9.0])];
        assert!(state.replace_slot(0, &bad).is_err());
        assert!(state.replace_slot(2, &sample(0.0)).is_err());
        assert_eq!(state, before);
        Ok(())
    }

    #[test]
    fn test_stateless_batch() -> Result<()> {
        let state = RecurrentState::from_samples(vec![vec![], vec![], vec![], vec![]])?;
        assert_eq!(state.batch_size(), 4);
        assert_eq!(state.n_components(), 0);
        assert_eq!(state.slot(3)?, Vec::<Array1<f32>>::new());
        Ok(())
    }

    #[test]
    fn test_new_checks_rows() {
        let c = Array2::<f32>::zeros((2, 4));
        let err = RecurrentState::new(3, vec![c]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RolloutError>(),
            Some(RolloutError::BatchSizeMismatch { expected: 3, got: 2 })
        ));
    }
}
