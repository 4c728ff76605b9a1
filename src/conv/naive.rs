//! Direct (sliding-window) valid correlation, the reference the Winograd
//! pipeline is checked against.
use crate::error::{Result, WinogradError};
use crate::matrix::Matrix;

/// Sum of `input[row + i][col + j] * filter[i][j]` over the filter window
/// anchored at `(row, col)`.
pub fn window_sum(input: &Matrix, filter: &Matrix, row: usize, col: usize) -> f64 {
    let mut sum = 0.0f64;
    for i in 0..filter.rows() {
        for j in 0..filter.cols() {
            sum += input.get(row + i, col + j) * filter.get(i, j);
        }
    }
    sum
}

/// Valid correlation of `input` with `filter`, no padding, stride 1.
///
/// Output is `(h - kh + 1) x (w - kw + 1)`; for a 4x4 tile and 3x3 filter
/// that is the 2x2 Winograd output. No rounding is applied.
pub fn direct_convolve(input: &Matrix, filter: &Matrix) -> Result<Matrix> {
    if filter.rows() > input.rows() || filter.cols() > input.cols() || filter.shape().is_empty() {
        return Err(WinogradError::DimensionMismatch {
            op: "direct_convolve",
            left: input.shape(),
            right: filter.shape(),
        });
    }
    let out_h = input.rows() - filter.rows() + 1;
    let out_w = input.cols() - filter.cols() + 1;
    Ok(Matrix::from_fn(out_h, out_w, |oh, ow| window_sum(input, filter, oh, ow)))
}
