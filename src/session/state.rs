use rand::Rng;
use tracing::debug;

use crate::conv::{FILTER_SIZE, TILE_SIZE};
use crate::error::{Result, WinogradError};
use crate::matrix::{Matrix, Shape};

/// The two user-editable matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Input,
    Filter,
}

impl MatrixKind {
    pub fn shape(&self) -> Shape {
        match self {
            MatrixKind::Input => Shape::new(TILE_SIZE, TILE_SIZE),
            MatrixKind::Filter => Shape::new(FILTER_SIZE, FILTER_SIZE),
        }
    }

    /// Exclusive upper bound of randomized cell values.
    pub fn upper_bound(&self) -> u32 {
        match self {
            MatrixKind::Input => 5,
            MatrixKind::Filter => 3,
        }
    }

    pub fn default_matrix(&self) -> Matrix {
        match self {
            MatrixKind::Input => Matrix::from_array([
                [1.0, 2.0, 3.0, 4.0],
                [5.0, 6.0, 7.0, 8.0],
                [9.0, 10.0, 11.0, 12.0],
                [13.0, 14.0, 15.0, 16.0],
            ]),
            MatrixKind::Filter => {
                Matrix::from_array([[1.0, 2.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 1.0]])
            }
        }
    }
}

/// A matrix of `kind`'s shape with cells drawn uniformly from `0..upper_bound`.
pub fn random_matrix<R: Rng + ?Sized>(kind: MatrixKind, rng: &mut R) -> Matrix {
    let Shape { rows, cols } = kind.shape();
    let upper = kind.upper_bound();
    Matrix::from_fn(rows, cols, |_, _| rng.random_range(0..upper) as f64)
}

/// Input tile and filter owned by the presentation layer and passed into
/// engine calls.
#[derive(Debug, Clone, PartialEq)]
pub struct WinogradState {
    input: Matrix,
    filter: Matrix,
}

impl Default for WinogradState {
    fn default() -> Self {
        WinogradState {
            input: MatrixKind::Input.default_matrix(),
            filter: MatrixKind::Filter.default_matrix(),
        }
    }
}

impl WinogradState {
    pub fn new(input: Matrix, filter: Matrix) -> Result<Self> {
        for (kind, m) in [(MatrixKind::Input, &input), (MatrixKind::Filter, &filter)] {
            if m.shape() != kind.shape() {
                return Err(WinogradError::DimensionMismatch {
                    op: "state",
                    left: m.shape(),
                    right: kind.shape(),
                });
            }
        }
        Ok(WinogradState { input, filter })
    }

    #[cfg(test)]
    pub(crate) fn unchecked(input: Matrix, filter: Matrix) -> Self {
        WinogradState { input, filter }
    }

    pub fn input(&self) -> &Matrix {
        &self.input
    }

    pub fn filter(&self) -> &Matrix {
        &self.filter
    }

    pub fn get(&self, kind: MatrixKind) -> &Matrix {
        match kind {
            MatrixKind::Input => &self.input,
            MatrixKind::Filter => &self.filter,
        }
    }

    /// Restore the default input and filter.
    pub fn reset(&mut self) {
        *self = WinogradState::default();
    }

    /// Replace one matrix with fresh random values and return it.
    pub fn randomize<R: Rng + ?Sized>(&mut self, kind: MatrixKind, rng: &mut R) -> &Matrix {
        let m = random_matrix(kind, rng);
        debug!(?kind, "randomized matrix");
        let slot = match kind {
            MatrixKind::Input => &mut self.input,
            MatrixKind::Filter => &mut self.filter,
        };
        *slot = m;
        slot
    }

    pub fn randomize_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.randomize(MatrixKind::Input, rng);
        self.randomize(MatrixKind::Filter, rng);
    }
}
