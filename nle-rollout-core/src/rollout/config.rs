//! Configuration of [`BatchedRollout`](super::BatchedRollout).
use serde::{Deserialize, Serialize};

/// Configuration of [`BatchedRollout`](super::BatchedRollout).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RolloutConfig {
    /// The number of episodes to complete before the rollout stops.
    pub num_assessments: usize,

    /// If `true`, actions, rewards, done flags and infos are logged at every step.
    pub print_steps: bool,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            num_assessments: 200,
            print_steps: false,
        }
    }
}

impl RolloutConfig {
    /// Sets the number of episodes to complete.
    pub fn num_assessments(mut self, v: usize) -> Self {
        self.num_assessments = v;
        self
    }

    /// Sets per-step logging.
    pub fn print_steps(mut self, v: bool) -> Self {
        self.print_steps = v;
        self
    }
}
