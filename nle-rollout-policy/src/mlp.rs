use crate::Mat;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
/// Multilayer perceptron with ReLU activation function between layers.
///
/// The output of the last layer is linear.
pub struct Mlp {
    /// Weights of layers, `out x in`.
    pub ws: Vec<Mat>,

    /// Biases of layers, `out x 1`.
    pub bs: Vec<Mat>,
}

impl Mlp {
    /// Applies the layers to a batch of column vectors.
    pub fn forward(&self, x: &Mat) -> Mat {
        let n_layers = self.ws.len();
        let mut x = x.clone();
        for i in 0..n_layers {
            x = self.ws[i].matmul(&x).add_col(&self.bs[i]);
            if i != n_layers - 1 {
                x = x.relu();
            }
        }
        x
    }

    /// Input size.
    pub fn in_dim(&self) -> usize {
        self.ws.first().map(|w| w.cols()).unwrap_or(0)
    }

    /// Output size.
    pub fn out_dim(&self) -> usize {
        self.ws.last().map(|w| w.rows()).unwrap_or(0)
    }

    /// Returns a description of the first inconsistency of layer shapes, if any.
    pub fn shape_error(&self) -> Option<String> {
        if self.ws.is_empty() {
            return Some("no layers".to_string());
        }
        if self.ws.len() != self.bs.len() {
            return Some(format!(
                "{} weights and {} biases",
                self.ws.len(),
                self.bs.len()
            ));
        }
        for (i, (w, b)) in self.ws.iter().zip(self.bs.iter()).enumerate() {
            if !w.is_valid() || !b.is_valid() {
                return Some(format!("layer {}: malformed matrix", i));
            }
        }
        let mut in_dim = self.in_dim();
        for (i, (w, b)) in self.ws.iter().zip(self.bs.iter()).enumerate() {
            if w.cols() != in_dim {
                return Some(format!(
                    "layer {}: input size {}, expected {}",
                    i,
                    w.cols(),
                    in_dim
                ));
            }
            if b.rows() != w.rows() || b.cols() != 1 {
                return Some(format!(
                    "layer {}: bias shape {:?}, weight shape {:?}",
                    i, b.shape, w.shape
                ));
            }
            in_dim = w.rows();
        }
        None
    }
}
