use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::error::{NetworkError, Result};
use crate::math::rng::GaussianRng;

/// Dense row-major matrix stored as one flat buffer.
///
/// Element `(i, j)` lives at `data[i * cols + j]`. For a weight matrix of
/// layer `l`, `rows` is the width of layer `l + 1` and `cols` the width of
/// layer `l`, so `(i, j)` is the weight from input neuron `j` to output
/// neuron `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps an existing flat buffer without copying.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        let len = rows
            .checked_mul(cols)
            .ok_or(NetworkError::SizeOverflow { rows, cols })?;
        if data.len() != len {
            return Err(NetworkError::mismatch(
                format!("{rows}x{cols} matrix data"),
                len,
                data.len(),
            ));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Standard normal entries multiplied by `scale`.
    pub fn gaussian(rows: usize, cols: usize, scale: f64, rng: &mut GaussianRng) -> Matrix {
        let mut data = rng.randn(rows * cols);
        for x in data.iter_mut() {
            *x *= scale;
        }
        Matrix { rows, cols, data }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// `out = self · x + b`
    ///
    /// `x` has length `cols`; `b` and `out` have length `rows`.
    pub fn dot_add(&self, x: &[f64], b: &[f64], out: &mut [f64]) {
        debug_assert_eq!(x.len(), self.cols);
        debug_assert_eq!(b.len(), self.rows);
        debug_assert_eq!(out.len(), self.rows);

        for i in 0..self.rows {
            let mut sum = 0.0;
            for j in 0..self.cols {
                sum += self.data[i * self.cols + j] * x[j];
            }
            out[i] = sum + b[i];
        }
    }

    /// `out = selfᵀ · v`
    ///
    /// `v` has length `rows`; `out` has length `cols`.
    pub fn transpose_dot(&self, v: &[f64], out: &mut [f64]) {
        debug_assert_eq!(v.len(), self.rows);
        debug_assert_eq!(out.len(), self.cols);

        for j in 0..self.cols {
            let mut sum = 0.0;
            for i in 0..self.rows {
                sum += self.data[i * self.cols + j] * v[i];
            }
            out[j] = sum;
        }
    }

    /// `self += column · rowᵀ`
    ///
    /// `column` has length `rows`; `row` has length `cols`.
    pub fn add_outer(&mut self, column: &[f64], row: &[f64]) {
        debug_assert_eq!(column.len(), self.rows);
        debug_assert_eq!(row.len(), self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                self.data[i * self.cols + j] += column[i] * row[j];
            }
        }
    }

    /// Sum of squared entries.
    pub fn squared_norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: usize, cols: usize, data: &[f64]) -> Matrix {
        Matrix::from_vec(rows, cols, data.to_vec()).unwrap()
    }

    #[test]
    fn test_dot_add_identity() {
        let w = matrix(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let mut out = [0.0; 2];
        w.dot_add(&[2.0, 3.0], &[3.0, 7.0], &mut out);
        assert_eq!(out, [5.0, 10.0]);
    }

    #[test]
    fn test_dot_add_ones() {
        let w = matrix(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let mut out = [0.0; 2];
        w.dot_add(&[2.0, 3.0], &[3.0, 7.0], &mut out);
        assert_eq!(out, [8.0, 12.0]);
    }

    #[test]
    fn test_dot_add_non_square() {
        let w = matrix(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut out = [0.0; 2];
        w.dot_add(&[7.0, 8.0, 9.0], &[1.0, 2.0], &mut out);
        assert_eq!(out, [51.0, 124.0]);
    }

    #[test]
    fn test_transpose_dot() {
        let w = matrix(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut out = [0.0; 3];
        w.transpose_dot(&[1.0, 2.0], &mut out);
        assert_eq!(out, [9.0, 12.0, 15.0]);
    }

    #[test]
    fn test_add_outer_and_index() {
        let mut m = Matrix::zeros(2, 3);
        m.add_outer(&[1.0, 2.0], &[1.0, 0.5, 0.0]);
        m.add_outer(&[1.0, 2.0], &[1.0, 0.5, 0.0]);
        assert_eq!(m[(0, 0)], 2.0);
        assert_eq!(m[(1, 1)], 2.0);
        assert_eq!(m[(1, 2)], 0.0);
        assert_eq!(m.row(1), &[4.0, 2.0, 0.0]);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0; 3]).is_err());
    }

    #[test]
    fn test_from_vec_rejects_overflowing_shape() {
        let err = Matrix::from_vec(usize::MAX, 2, vec![]).unwrap_err();
        assert!(matches!(err, NetworkError::SizeOverflow { cols: 2, .. }));
    }

    #[test]
    fn test_squared_norm() {
        let m = matrix(1, 3, &[1.0, -2.0, 2.0]);
        assert_eq!(m.squared_norm(), 9.0);
    }
}
