//! Discrete action.
use nle_rollout_core::Act;

/// Discrete action of the game, an index into its action set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NleAct(pub i64);

impl Act for NleAct {
    /// Action 0.
    fn noop() -> Self {
        NleAct(0)
    }
}

impl From<i64> for NleAct {
    fn from(a: i64) -> Self {
        NleAct(a)
    }
}
