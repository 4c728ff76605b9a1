//! Primitive matrix operations used by the Winograd pipeline.
//!
//! C\[i,j\] = sum_k A\[i,k\] * B\[k,j\]

use super::{Matrix, Shape};
use crate::error::{Result, WinogradError};

/// Number of decimal digits results are rounded to for display and comparison.
pub const DISPLAY_DECIMALS: u32 = 3;

/// Largest rounding precision accepted. `10^15` is still exact in an `f64`.
pub const MAX_DECIMALS: u32 = 15;

/// Round to `decimals` digits: `round(v * 10^d) / 10^d`, ties away from zero.
/// Precision above [`MAX_DECIMALS`] is clamped to it.
#[inline]
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10u64.pow(decimals.min(MAX_DECIMALS)) as f64;
    (v * scale).round() / scale
}

pub fn round_matrix(m: &Matrix, decimals: u32) -> Matrix {
    m.map(|v| round_to(v, decimals))
}

fn check_conformant(op: &'static str, a: &Matrix, b: &Matrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(WinogradError::DimensionMismatch {
            op,
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(())
}

/// Matrix product without rounding.
///
/// `result[i][j]` accumulates `a[i][k] * b[k][j]` for k in increasing order;
/// the animation layer replays exactly this order.
pub fn multiply_exact(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_conformant("multiply", a, b)?;
    let p = a.cols();
    Ok(Matrix::from_fn(a.rows(), b.cols(), |i, j| {
        let mut sum = 0.0f64;
        for k in 0..p {
            sum += a.get(i, k) * b.get(k, j);
        }
        sum
    }))
}

/// Matrix product with every output cell rounded to `decimals` digits.
pub fn multiply_rounded(a: &Matrix, b: &Matrix, decimals: u32) -> Result<Matrix> {
    Ok(round_matrix(&multiply_exact(a, b)?, decimals))
}

/// Matrix product rounded to [`DISPLAY_DECIMALS`].
///
/// Fails with `DimensionMismatch` when `a.cols != b.rows`; never pads or truncates.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    multiply_rounded(a, b, DISPLAY_DECIMALS)
}

pub fn transpose(m: &Matrix) -> Matrix {
    Matrix::from_fn(m.cols(), m.rows(), |r, c| m.get(c, r))
}

/// Hadamard product of two equally shaped matrices. No rounding.
pub fn elementwise_product(u: &Matrix, v: &Matrix) -> Result<Matrix> {
    if u.shape() != v.shape() {
        return Err(WinogradError::DimensionMismatch {
            op: "elementwise_product",
            left: u.shape(),
            right: v.shape(),
        });
    }
    let Shape { rows, cols } = u.shape();
    Ok(Matrix::from_fn(rows, cols, |r, c| u.get(r, c) * v.get(r, c)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matrix_strategy(rows: usize, cols: usize) -> impl Strategy<Value = Matrix> {
        proptest::collection::vec(-10.0f64..10.0, rows * cols).prop_map(move |data| {
            Matrix::from_fn(rows, cols, |r, c| data[r * cols + c])
        })
    }

    fn shape_strategy() -> impl Strategy<Value = (usize, usize, usize)> {
        (1usize..6, 1usize..6, 1usize..6)
    }

    #[test]
    fn round_to_three_places() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(-0.0004, 3), 0.0);
        assert_eq!(round_to(2.0, 3), 2.0);
    }

    #[test]
    fn round_to_clamps_precision() {
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(34.0, 400), 34.0);
        assert_eq!(round_to(34.0, u32::MAX), 34.0);
        assert_eq!(round_to(0.1, u32::MAX), round_to(0.1, MAX_DECIMALS));
    }

    #[test]
    fn multiply_known_product() {
        let a = Matrix::from_array([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::from_array([[5.0, 6.0], [7.0, 8.0]]);
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c, Matrix::from_array([[19.0, 22.0], [43.0, 50.0]]));
    }

    #[test]
    fn multiply_rounds_each_cell() {
        let a = Matrix::from_array([[1.0 / 3.0]]);
        let b = Matrix::from_array([[1.0]]);
        assert_eq!(multiply(&a, &b).unwrap().get(0, 0), 0.333);
        assert_eq!(multiply_exact(&a, &b).unwrap().get(0, 0), 1.0 / 3.0);
    }

    #[test]
    fn multiply_rejects_mismatch() {
        let a = Matrix::zeros(4, 3);
        let b = Matrix::zeros(4, 4);
        let err = multiply(&a, &b).unwrap_err();
        assert_eq!(
            err,
            WinogradError::DimensionMismatch {
                op: "multiply",
                left: Shape::new(4, 3),
                right: Shape::new(4, 4),
            }
        );
    }

    #[test]
    fn elementwise_rejects_mismatch() {
        let u = Matrix::zeros(4, 4);
        let v = Matrix::zeros(4, 3);
        assert!(matches!(
            elementwise_product(&u, &v),
            Err(WinogradError::DimensionMismatch { op: "elementwise_product", .. })
        ));
    }

    #[test]
    fn transpose_rectangular() {
        let g = Matrix::from_array([[1.0, 0.0, 0.0], [0.5, 0.5, 0.5]]);
        let gt = transpose(&g);
        assert_eq!(gt.shape(), Shape::new(3, 2));
        assert_eq!(gt.get(2, 1), 0.5);
        assert_eq!(gt.get(0, 1), 0.5);
    }

    proptest! {
        #[test]
        fn prop_multiply_cell_is_rounded_dot(
            (m, p, n) in shape_strategy(),
            seed in any::<u64>(),
        ) {
            let a = Matrix::from_fn(m, p, |r, c| ((seed as f64) * 1e-9 + (r * 7 + c * 3) as f64).sin() * 5.0);
            let b = Matrix::from_fn(p, n, |r, c| ((seed as f64) * 1e-9 + (r * 5 + c * 11) as f64).cos() * 5.0);
            let c = multiply(&a, &b).unwrap();
            prop_assert_eq!(c.shape(), Shape::new(m, n));
            for i in 0..m {
                for j in 0..n {
                    let mut sum = 0.0;
                    for k in 0..p {
                        sum += a.get(i, k) * b.get(k, j);
                    }
                    prop_assert_eq!(c.get(i, j), round_to(sum, 3));
                }
            }
        }

        #[test]
        fn prop_transpose_twice_is_identity(m in (1usize..6, 1usize..6).prop_flat_map(|(r, c)| matrix_strategy(r, c))) {
            prop_assert_eq!(transpose(&transpose(&m)), m);
        }

        #[test]
        fn prop_elementwise_commutes(
            (u, v) in (1usize..6, 1usize..6).prop_flat_map(|(r, c)| (matrix_strategy(r, c), matrix_strategy(r, c)))
        ) {
            prop_assert_eq!(elementwise_product(&u, &v).unwrap(), elementwise_product(&v, &u).unwrap());
        }

        #[test]
        fn prop_multiply_mismatch_always_fails(
            (m, p, n) in shape_strategy(),
            extra in 1usize..4,
        ) {
            let a = Matrix::zeros(m, p);
            let b = Matrix::zeros(p + extra, n);
            let is_mismatch = matches!(multiply(&a, &b), Err(WinogradError::DimensionMismatch { .. }));
            prop_assert!(is_mismatch);
        }
    }
}
