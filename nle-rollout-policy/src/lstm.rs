use crate::Mat;
use serde::{Deserialize, Serialize};

/// LSTM cell.
///
/// Gates are stacked in the order input, forget, cell and output, so every
/// weight has `4 * cell_size` rows.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LstmCell {
    /// Input weights, `4h x in`.
    pub w_ih: Mat,

    /// Recurrent weights, `4h x h`.
    pub w_hh: Mat,

    /// Bias, `4h x 1`.
    pub b: Mat,
}

impl LstmCell {
    pub fn cell_size(&self) -> usize {
        self.w_hh.cols()
    }

    pub fn in_dim(&self) -> usize {
        self.w_ih.cols()
    }

    /// Returns a description of the first inconsistency of shapes, if any.
    pub fn shape_error(&self) -> Option<String> {
        if !self.w_ih.is_valid() || !self.w_hh.is_valid() || !self.b.is_valid() {
            return Some("malformed matrix".to_string());
        }
        let h = self.cell_size();
        if self.w_hh.rows() != 4 * h || self.w_ih.rows() != 4 * h {
            return Some(format!(
                "gate sizes {} and {}, expected {}",
                self.w_ih.rows(),
                self.w_hh.rows(),
                4 * h
            ));
        }
        if self.b.rows() != 4 * h || self.b.cols() != 1 {
            return Some(format!("bias shape {:?}", self.b.shape));
        }
        None
    }

    /// Advances the cell on a batch of column vectors, returning `(h, c)`.
    pub fn step(&self, x: &Mat, h: &Mat, c: &Mat) -> (Mat, Mat) {
        let n = self.cell_size();
        let gates = self
            .w_ih
            .matmul(x)
            .add(&self.w_hh.matmul(h))
            .add_col(&self.b);
        let i = gates.slice_rows(0, n).sigmoid();
        let f = gates.slice_rows(n, 2 * n).sigmoid();
        let g = gates.slice_rows(2 * n, 3 * n).tanh();
        let o = gates.slice_rows(3 * n, 4 * n).sigmoid();
        let c = f.mul(c).add(&i.mul(&g));
        let h = o.mul(&c.tanh());
        (h, c)
    }
}
