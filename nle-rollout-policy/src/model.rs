//! Network of a policy.
use crate::{LstmCell, Mat, Mlp};
use serde::{Deserialize, Serialize};

/// Options of the network, the `model` section of a training configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Wraps the encoder output with an LSTM.
    pub use_lstm: bool,

    /// Size of the LSTM state.
    pub lstm_cell_size: usize,

    /// Feeds the one-hot previous action to the LSTM.
    pub lstm_use_prev_action: bool,

    /// Feeds the previous reward to the LSTM.
    pub lstm_use_prev_reward: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            use_lstm: false,
            lstm_cell_size: 256,
            lstm_use_prev_action: false,
            lstm_use_prev_reward: false,
        }
    }
}

/// Parameters of a policy network.
///
/// ```text
/// obs -> encoder -> relu -> [prev action, prev reward] -> lstm? -> head
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NetParams {
    /// Encoder of the flattened observation.
    pub encoder: Mlp,

    /// Recurrent core.
    pub lstm: Option<LstmCell>,

    /// Action head, logits or Q-values.
    pub head: Mlp,
}

/// A network with the options it was trained with.
#[derive(Clone, Debug)]
pub struct Net {
    params: NetParams,
    config: ModelConfig,
}

impl Net {
    /// Checks the parameters against the options and the observation size.
    pub fn new(params: NetParams, config: ModelConfig, obs_size: usize) -> Result<Self, String> {
        if let Some(e) = params.encoder.shape_error() {
            return Err(format!("encoder: {}", e));
        }
        if params.encoder.in_dim() != obs_size {
            return Err(format!(
                "encoder input size {}, observation size {}",
                params.encoder.in_dim(),
                obs_size
            ));
        }
        if let Some(e) = params.head.shape_error() {
            return Err(format!("head: {}", e));
        }
        let num_actions = params.head.out_dim();
        let core_in = params.encoder.out_dim()
            + match config.lstm_use_prev_action {
                true => num_actions,
                false => 0,
            }
            + match config.lstm_use_prev_reward {
                true => 1,
                false => 0,
            };

        let head_in = match (&params.lstm, config.use_lstm) {
            (Some(lstm), true) => {
                if let Some(e) = lstm.shape_error() {
                    return Err(format!("lstm: {}", e));
                }
                if lstm.cell_size() != config.lstm_cell_size {
                    return Err(format!(
                        "lstm cell size {}, configured {}",
                        lstm.cell_size(),
                        config.lstm_cell_size
                    ));
                }
                if lstm.in_dim() != core_in {
                    return Err(format!(
                        "lstm input size {}, expected {}",
                        lstm.in_dim(),
                        core_in
                    ));
                }
                lstm.cell_size()
            }
            (None, false) => core_in,
            (Some(_), false) => return Err("lstm parameters in a feedforward model".to_string()),
            (None, true) => return Err("no lstm parameters in a recurrent model".to_string()),
        };
        if params.head.in_dim() != head_in {
            return Err(format!(
                "head input size {}, expected {}",
                params.head.in_dim(),
                head_in
            ));
        }

        Ok(Self { params, config })
    }

    /// Number of outputs of the head, one per action.
    pub fn num_actions(&self) -> usize {
        self.params.head.out_dim()
    }

    /// Size of the LSTM state, 0 without LSTM.
    pub fn cell_size(&self) -> usize {
        self.params.lstm.as_ref().map(|l| l.cell_size()).unwrap_or(0)
    }

    /// Computes head outputs for a batch of column vectors.
    ///
    /// `hc` is the LSTM state `(h, c)`, ignored without LSTM. Returns the head
    /// outputs, `num_actions x n`, and the next LSTM state.
    pub fn forward(
        &self,
        x: &Mat,
        prev_acts: &[i64],
        prev_rewards: &[f32],
        hc: Option<(&Mat, &Mat)>,
    ) -> (Mat, Option<(Mat, Mat)>) {
        let z = self.params.encoder.forward(x).relu();
        let mut parts = vec![z];
        if self.config.lstm_use_prev_action {
            let cols: Vec<Vec<f32>> = prev_acts
                .iter()
                .map(|a| {
                    let mut v = vec![0f32; self.num_actions()];
                    if *a >= 0 && (*a as usize) < v.len() {
                        v[*a as usize] = 1.0;
                    }
                    v
                })
                .collect();
            parts.push(Mat::from_columns(&cols));
        }
        if self.config.lstm_use_prev_reward {
            parts.push(Mat::new(
                prev_rewards.to_vec(),
                vec![1, prev_rewards.len() as _],
            ));
        }
        let z = Mat::vstack(&parts.iter().collect::<Vec<_>>());

        match (&self.params.lstm, hc) {
            (Some(lstm), Some((h, c))) => {
                let (h, c) = lstm.step(&z, h, c);
                (self.params.head.forward(&h), Some((h, c)))
            }
            _ => (self.params.head.forward(&z), None),
        }
    }
}
