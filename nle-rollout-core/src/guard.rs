//! Serialization of environment construction.
use crate::{error::RolloutError, Env};
use anyhow::Result;
use log::trace;
use std::sync::{Arc, Mutex};

/// A handle serializing construction of environments.
///
/// Some environments run a non-reentrant setup when they are built. The owner
/// of the construction phase creates one guard and passes clones of it to every
/// place environments are built; the guard is not needed once construction is
/// finished.
#[derive(Clone, Debug, Default)]
pub struct EnvBuildGuard(Arc<Mutex<()>>);

impl EnvBuildGuard {
    /// Creates a new guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an environment while holding the lock.
    pub fn build<E: Env>(&self, config: &E::Config, seed: i64) -> Result<E> {
        let _lock = self.0.lock().map_err(|_| RolloutError::GuardPoisoned)?;
        trace!("EnvBuildGuard::build(seed = {})", seed);
        E::build(config, seed)
    }
}
