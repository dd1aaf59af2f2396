/// Returns and lengths of the episodes completed in a rollout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RolloutStats {
    /// Sum of rewards of each completed episode, in completion order.
    pub returns: Vec<f32>,

    /// Number of steps of each completed episode, in completion order.
    pub lengths: Vec<usize>,

    /// The number of batched steps taken.
    pub n_steps: usize,
}

impl RolloutStats {
    /// Returns the number of completed episodes.
    pub fn n_episodes(&self) -> usize {
        self.returns.len()
    }

    /// Mean episode return, `None` if no episode completed.
    pub fn mean_return(&self) -> Option<f32> {
        match self.returns.len() {
            0 => None,
            n => Some(self.returns.iter().sum::<f32>() / n as f32),
        }
    }

    /// Mean episode length, `None` if no episode completed.
    pub fn mean_length(&self) -> Option<f32> {
        match self.lengths.len() {
            0 => None,
            n => Some(self.lengths.iter().sum::<usize>() as f32 / n as f32),
        }
    }

    pub(super) fn push(&mut self, ret: f32, len: usize) {
        self.returns.push(ret);
        self.lengths.push(len);
    }
}
