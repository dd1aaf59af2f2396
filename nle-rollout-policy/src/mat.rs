//! Row-major matrix used by models without a backend.
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// A row-major matrix.
///
/// Inputs of a model are batched as columns, so a batch of `n` vectors of size
/// `d` is a `d x n` matrix.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Mat {
    pub data: Vec<f32>,
    pub shape: Vec<i32>,
}

impl Mat {
    pub fn new(data: Vec<f32>, shape: Vec<i32>) -> Self {
        Self { data, shape }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0f32; rows * cols],
            shape: vec![rows as _, cols as _],
        }
    }

    /// Stacks vectors of the same size as columns.
    pub fn from_columns(columns: &[Vec<f32>]) -> Self {
        let n = columns.len();
        let m = columns.first().map(|c| c.len()).unwrap_or(0);
        let mut data = vec![0f32; m * n];
        for (j, c) in columns.iter().enumerate() {
            for (i, v) in c.iter().enumerate() {
                data[i * n + j] = *v;
            }
        }
        Self {
            data,
            shape: vec![m as _, n as _],
        }
    }

    /// Converts a state component, one row per slot, to a matrix with one column per slot.
    pub fn from_rows_of(a: &Array2<f32>) -> Self {
        let (n, m) = a.dim();
        Self {
            data: a.t().iter().cloned().collect(),
            shape: vec![m as _, n as _],
        }
    }

    /// Converts back to one row per column of this matrix.
    pub fn to_rows(&self) -> Array2<f32> {
        let (m, n) = (self.rows(), self.cols());
        let mut a = Array2::zeros((n, m));
        for i in 0..m {
            for j in 0..n {
                a[[j, i]] = self.data[i * n + j];
            }
        }
        a
    }

    pub fn rows(&self) -> usize {
        self.shape[0] as _
    }

    pub fn cols(&self) -> usize {
        self.shape[1] as _
    }

    /// Returns `true` if the shape is two dimensional and matches the data.
    pub fn is_valid(&self) -> bool {
        match self.shape[..] {
            [m, n] => match (usize::try_from(m), usize::try_from(n)) {
                (Ok(m), Ok(n)) => m.checked_mul(n) == Some(self.data.len()),
                _ => false,
            },
            _ => false,
        }
    }

    pub fn column(&self, j: usize) -> Vec<f32> {
        let n = self.cols();
        (0..self.rows()).map(|i| self.data[i * n + j]).collect()
    }

    pub fn matmul(&self, x: &Mat) -> Self {
        let (m, l, n) = (self.rows(), self.cols(), x.cols());
        let mut data = vec![0.0f32; m * n];
        for i in 0..m {
            for j in 0..n {
                let kk = i * n + j;
                for k in 0..l {
                    data[kk] += self.data[i * l + k] * x.data[k * n + j];
                }
            }
        }

        Self {
            shape: vec![m as _, n as _],
            data,
        }
    }

    pub fn add(&self, x: &Mat) -> Self {
        if self.shape != x.shape {
            panic!(
                "Trying to add matrices of different sizes: {:?}",
                (&self.shape, &x.shape)
            );
        }

        let data = self
            .data
            .iter()
            .zip(x.data.iter())
            .map(|(a, b)| *a + *b)
            .collect();

        Mat {
            data,
            shape: self.shape.clone(),
        }
    }

    /// Adds a column vector to every column.
    pub fn add_col(&self, b: &Mat) -> Self {
        if b.rows() != self.rows() || b.cols() != 1 {
            panic!(
                "Trying to broadcast a bias of size {:?} to {:?}",
                &b.shape, &self.shape
            );
        }

        let n = self.cols();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(k, a)| *a + b.data[k / n])
            .collect();

        Mat {
            data,
            shape: self.shape.clone(),
        }
    }

    /// Stacks matrices with the same number of columns on top of each other.
    pub fn vstack(mats: &[&Mat]) -> Self {
        let n = mats.first().map(|m| m.cols()).unwrap_or(0);
        let rows = mats.iter().map(|m| m.rows()).sum::<usize>();
        let data = mats.iter().flat_map(|m| m.data.iter().cloned()).collect();
        Self {
            data,
            shape: vec![rows as _, n as _],
        }
    }

    /// Returns rows `start..end`.
    pub fn slice_rows(&self, start: usize, end: usize) -> Self {
        let n = self.cols();
        Self {
            data: self.data[start * n..end * n].to_vec(),
            shape: vec![(end - start) as _, n as _],
        }
    }

    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            data: self.data.iter().map(|a| f(*a)).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Elementwise product.
    pub fn mul(&self, x: &Mat) -> Self {
        Self {
            data: self
                .data
                .iter()
                .zip(x.data.iter())
                .map(|(a, b)| *a * *b)
                .collect(),
            shape: self.shape.clone(),
        }
    }

    pub fn relu(&self) -> Self {
        self.map(|a| match a < 0. {
            true => 0.,
            false => a,
        })
    }

    pub fn tanh(&self) -> Self {
        self.map(f32::tanh)
    }

    pub fn sigmoid(&self) -> Self {
        self.map(|a| 1.0 / (1.0 + (-a).exp()))
    }
}

impl From<Vec<f32>> for Mat {
    fn from(x: Vec<f32>) -> Self {
        let shape = vec![x.len() as i32, 1];
        Self { shape, data: x }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_matmul() {
        let x = Mat::new(vec![1.0, 2., 3., 4., 5., 6.], vec![2, 3]);
        let y: Mat = vec![7.0, 8., 9.].into();
        assert_eq!(x.matmul(&y), Mat::new(vec![50.0, 122.0], vec![2, 1]));
    }

    #[test]
    fn test_is_valid() {
        assert!(Mat::zeros(2, 3).is_valid());
        assert!(Mat::new(vec![], vec![0, 4]).is_valid());
        assert!(!Mat::new(vec![0.0; 6], vec![2, 2]).is_valid());
        assert!(!Mat::new(vec![0.0; 6], vec![6]).is_valid());
        assert!(!Mat::new(vec![], vec![-1, 0]).is_valid());
        assert!(!Mat::new(vec![], vec![65536, 65536]).is_valid());
        assert!(!Mat::new(vec![], vec![i32::MAX, i32::MAX]).is_valid());
    }

    #[test]
    fn test_columns() {
        let x = Mat::from_columns(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(x.shape, vec![2, 3]);
        assert_eq!(x.column(1), vec![3.0, 4.0]);

        let b: Mat = vec![10.0, 20.0].into();
        assert_eq!(x.add_col(&b).column(2), vec![15.0, 26.0]);
    }

    #[test]
    fn test_rows_conversion() {
        let a = arr2(&[[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let m = Mat::from_rows_of(&a);
        assert_eq!(m.shape, vec![3, 2]);
        assert_eq!(m.column(0), vec![1.0, 2.0, 3.0]);
        assert_eq!(m.to_rows(), a);
    }

    #[test]
    fn test_vstack_slice() {
        let a = Mat::from_columns(&[vec![1.0], vec![2.0]]);
        let b = Mat::from_columns(&[vec![3.0, 4.0], vec![5.0, 6.0]]);
        let c = Mat::vstack(&[&a, &b]);
        assert_eq!(c.shape, vec![3, 2]);
        assert_eq!(c.column(1), vec![2.0, 5.0, 6.0]);
        assert_eq!(c.slice_rows(1, 3), b);
    }
}
