//! Observation made of named channels.
use crate::util::Array;
use nle_rollout_core::Obs;

/// An observation made of named channels.
///
/// Channels iterate in the order they were given. Observations emitted by
/// [`NleEnv`](crate::NleEnv) are sorted by channel name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DictObs(Vec<(String, Array)>);

impl Obs for DictObs {}

impl From<Vec<(String, Array)>> for DictObs {
    fn from(entries: Vec<(String, Array)>) -> Self {
        Self(entries)
    }
}

impl DictObs {
    /// Returns the channel names in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the channel of the given name.
    pub fn get(&self, key: &str) -> Option<&Array> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the channels.
    pub fn entries(&self) -> &[(String, Array)] {
        &self.0
    }

    /// Returns the number of channels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if channels iterate in ascending order of their names.
    pub fn is_sorted(&self) -> bool {
        self.0.windows(2).all(|w| w[0].0 <= w[1].0)
    }

    /// Returns the observation with channels sorted by name, values unchanged.
    pub fn sorted(mut self) -> Self {
        self.0.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, ArrayD};

    fn channel(v: u8) -> Array {
        let a: ArrayD<u8> = arr1(&[v, v]).into_dyn();
        a.into()
    }

    #[test]
    fn test_sorted_is_idempotent() {
        let obs: DictObs = vec![
            ("tty_chars".to_string(), channel(1)),
            ("blstats".to_string(), channel(2)),
            ("glyphs".to_string(), channel(3)),
        ]
        .into();
        assert!(!obs.is_sorted());

        let once = obs.clone().sorted();
        let twice = once.clone().sorted();
        assert!(once.is_sorted());
        assert_eq!(once, twice);
        assert_eq!(
            once.keys().collect::<Vec<_>>(),
            vec!["blstats", "glyphs", "tty_chars"]
        );
        assert_eq!(once.get("glyphs"), obs.get("glyphs"));
    }
}
