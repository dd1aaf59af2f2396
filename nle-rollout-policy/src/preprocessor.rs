//! Flattening of dictionary observations into model inputs.
use anyhow::Result;
use nle_rollout_core::error::RolloutError;
use nle_rollout_env::DictObs;
use serde::{Deserialize, Serialize};

/// A channel fed to the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Name of the observation channel.
    pub key: String,

    /// Number of elements of the channel.
    pub size: usize,

    /// Factor applied to every element.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

/// Configuration of [`ObsPreprocessor`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObsPreprocessorConfig {
    /// Channels fed to the model, in any order.
    pub channels: Vec<ChannelConfig>,
}

/// Maps a [`DictObs`] to the flat input vector of a model.
///
/// Configured channels are concatenated in ascending order of their names,
/// the order [`NleEnv`](nle_rollout_env::NleEnv) emits them in.
#[derive(Clone, Debug)]
pub struct ObsPreprocessor {
    channels: Vec<ChannelConfig>,
    size: usize,
}

impl ObsPreprocessor {
    /// Builds the preprocessor.
    pub fn build(config: &ObsPreprocessorConfig) -> Result<Self> {
        let mut channels = config.channels.clone();
        channels.sort_by(|a, b| a.key.cmp(&b.key));
        if let Some(w) = channels.windows(2).find(|w| w[0].key == w[1].key) {
            return Err(RolloutError::InvalidConfig(format!(
                "channel {} is configured twice",
                w[0].key
            ))
            .into());
        }
        let size = channels.iter().map(|c| c.size).sum();
        Ok(Self { channels, size })
    }

    /// Size of the output vector.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Channel names, in output order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.key.as_str())
    }

    /// Flattens an observation.
    pub fn transform(&self, obs: &DictObs) -> Result<Vec<f32>> {
        let mut out = Vec::with_capacity(self.size);
        for c in self.channels.iter() {
            let a = obs
                .get(&c.key)
                .ok_or_else(|| RolloutError::MissingObsKey(c.key.clone()))?;
            if a.len() != c.size {
                return Err(RolloutError::InvalidArgument(format!(
                    "channel {} has {} elements, expected {}",
                    c.key,
                    a.len(),
                    c.size
                ))
                .into());
            }
            out.extend(a.to_flat_vec::<f32>().into_iter().map(|v| v * c.scale));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, ArrayD};
    use nle_rollout_env::util::Array;

    fn obs() -> DictObs {
        let blstats: ArrayD<i64> = arr1(&[10, 20, 30]).into_dyn();
        let glyphs: ArrayD<i16> = arr2(&[[1, 2], [3, 4]]).into_dyn();
        let message: ArrayD<u8> = arr1(&[65, 66]).into_dyn();
        vec![
            ("blstats".to_string(), Array::from(blstats)),
            ("glyphs".to_string(), Array::from(glyphs)),
            ("message".to_string(), Array::from(message)),
        ]
        .into()
    }

    fn channel(key: &str, size: usize, scale: f32) -> ChannelConfig {
        ChannelConfig {
            key: key.to_string(),
            size,
            scale,
        }
    }

    #[test]
    fn test_transform_sorted_and_scaled() -> Result<()> {
        let config = ObsPreprocessorConfig {
            channels: vec![channel("glyphs", 4, 0.5), channel("blstats", 3, 0.1)],
        };
        let p = ObsPreprocessor::build(&config)?;
        assert_eq!(p.size(), 7);
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["blstats", "glyphs"]);

        let x = p.transform(&obs())?;
        assert_eq!(x.len(), 7);
        assert!((x[0] - 1.0).abs() < 1e-6);
        assert_eq!(&x[3..], &[0.5, 1.0, 1.5, 2.0]);
        Ok(())
    }

    #[test]
    fn test_size_mismatch() -> Result<()> {
        let config = ObsPreprocessorConfig {
            channels: vec![channel("glyphs", 5, 1.0)],
        };
        let p = ObsPreprocessor::build(&config)?;
        assert!(p.transform(&obs()).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_channel() -> Result<()> {
        let config = ObsPreprocessorConfig {
            channels: vec![channel("tty_chars", 4, 1.0)],
        };
        let err = ObsPreprocessor::build(&config)?
            .transform(&obs())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RolloutError>(),
            Some(RolloutError::MissingObsKey(_))
        ));
        Ok(())
    }

    #[test]
    fn test_duplicate_channel() {
        let config = ObsPreprocessorConfig {
            channels: vec![channel("glyphs", 4, 1.0), channel("glyphs", 4, 1.0)],
        };
        assert!(ObsPreprocessor::build(&config).is_err());
    }
}
