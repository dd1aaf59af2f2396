//! Environment step.
use super::Env;
use std::fmt::Debug;

/// Additional information to `Obs` and `Act`.
pub trait Info: Clone + Debug {
    /// How the episode ended, if the environment reports it.
    fn end_status(&self) -> Option<String> {
        None
    }
}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// An environment emits [`Step`] object at every interaction steps.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// Observation.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode ended.
    pub is_done: bool,

    /// Information defined by the environment.
    pub info: E::Info,

    /// Initial observation of the next episode.
    ///
    /// Set by [`Env::step_with_reset`] when `is_done` is `true`, `None` otherwise.
    pub init_obs: Option<E::Obs>,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: E::Obs, act: E::Act, reward: f32, is_done: bool, info: E::Info) -> Self {
        Step {
            act,
            obs,
            reward,
            is_done,
            info,
            init_obs: None,
        }
    }

    /// Returns the observation a policy should see next.
    ///
    /// This is the reset observation if the episode ended, otherwise the
    /// observation of this step.
    pub fn next_obs(self) -> E::Obs {
        match self.init_obs {
            Some(obs) => obs,
            None => self.obs,
        }
    }
}
