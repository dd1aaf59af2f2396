//! NetHack environment with a stable observation schema.
//!
//! [`NleEnv`] wraps any [`DictEnv`], a game emitting observations as named channels,
//! and implements [`Env`](nle_rollout_core::Env) on top of it. The channels of every
//! observation are put in ascending order of their names, so that [`DictObs`]
//! has the same positional layout whatever order the game uses internally.
//!
//! [`NleEnvConfig`] holds the construction options of the game. The options are
//! translated into the arguments of the task class with [`NleEnvConfig::kwargs`],
//! where rewards of winning and losing are passed only to tasks ending in a win
//! or a loss.
//!
//! With feature `python`, [`PyNleEnv`] creates the tasks of the `nle` Python package
//! through [`PyO3`](https://github.com/PyO3/pyo3).
mod act;
mod base;
mod config;
mod obs;
#[cfg(feature = "python")]
mod py;
pub mod util;
pub use act::NleAct;
pub use base::{DictEnv, NleEnv, NleInfo, RawStep};
pub use config::{NleEnvConfig, NleEnvKwargs, NleTask, DEFAULT_OBSERVATION_KEYS};
pub use obs::DictObs;
#[cfg(feature = "python")]
pub use py::PyNleEnv;
