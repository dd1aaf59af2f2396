//! Core functionalities.
mod env;
mod policy;
mod step;
pub use env::Env;
pub use policy::RecurrentPolicy;
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// Unlike a vectorized environment, an [`Env`] in this library emits a single
/// observation per step. Batching is done by [`EnvBatch`](crate::EnvBatch).
pub trait Obs: Clone + Debug {}

/// An action of an environment.
pub trait Act: Clone + Debug {
    /// Returns the action fed to a policy as "previous action" at the beginning
    /// of an episode.
    fn noop() -> Self;
}
