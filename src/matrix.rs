use crate::utils;

use rand::Rng;
use std::ops::{Index, IndexMut, Range};
use std::slice::Chunks;

/// A dense rectangular matrix of weights.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mat {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Creates a matrix whose elements are drawn uniformly from `range`.
    pub fn random<R>(rng: &mut R, rows: usize, cols: usize, range: Range<f64>) -> Self
    where
        R: Rng + ?Sized,
    {
        Mat {
            rows,
            cols,
            data: utils::random_vec(rng, rows * cols, range),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `i`, i.e. the weights of node `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterates over the rows in order.
    pub fn iter_rows(&self) -> Rows {
        Rows {
            chunks: self.data.chunks(self.cols.max(1)),
            remaining: self.rows,
        }
    }
}

/// Iterator over the rows of a `Mat`.
pub struct Rows<'a> {
    chunks: Chunks<'a, f64>,
    remaining: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // Zero-width rows have no backing chunk.
        Some(self.chunks.next().unwrap_or(&[]))
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(col < self.cols, "column {} out of bounds", col);
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(col < self.cols, "column {} out of bounds", col);
        &mut self.data[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zeros_has_requested_shape() {
        let m = Mat::zeros(2, 3);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.iter_rows().count(), 2);
        assert!(m.iter_rows().all(|row| row == [0.0, 0.0, 0.0]));
    }

    #[test]
    fn rows_are_row_major() {
        let mut m = Mat::zeros(2, 2);
        m[(0, 1)] = 1.0;
        m[(1, 0)] = 2.0;
        m.row_mut(1)[1] = 3.0;
        assert_eq!(m.row(0), &[0.0, 1.0]);
        assert_eq!(m.row(1), &[2.0, 3.0]);
    }

    #[test]
    fn random_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let m = Mat::random(&mut rng, 3, 4, 0.0..1.0);
        assert_eq!(m.iter_rows().count(), 3);
        for row in m.iter_rows() {
            assert_eq!(row.len(), 4);
            assert!(row.iter().all(|&x| x >= 0.0 && x < 1.0));
        }
    }

    #[test]
    fn zero_width_rows_still_iterate() {
        let m = Mat::zeros(3, 0);
        assert_eq!(m.iter_rows().count(), 3);
        assert!(m.iter_rows().all(|row| row.is_empty()));
    }

    #[test]
    #[should_panic]
    fn column_overflow_panics() {
        let m = Mat::zeros(2, 2);
        let _ = m[(0, 2)];
    }
}
