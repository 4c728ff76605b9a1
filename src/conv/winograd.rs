//! Winograd F(2x2, 3x3) tile pipeline with every intermediate kept for display.
//!
//! Stages, with the constants below:
//!   U = B * d * B^T        (input transform, 4x4)
//!   V = G * g * G^T        (filter transform, 4x4)
//!   M = U (.) V            (elementwise, 4x4)
//!   Y = A * M * A^T        (inverse transform, 2x2)
//!
//! Each sandwich product is computed right side first (`d * B^T`, then `B *`)
//! so the right-hand intermediate is what gets shown.
use serde::Serialize;

use crate::config::{EngineConfig, RoundingPolicy};
use crate::error::Result;
use crate::matrix::{
    elementwise_product, multiply_exact, multiply_rounded, round_matrix, transpose, Matrix,
};

use super::naive::direct_convolve;
use super::ConvAlgorithm;

// B for F(2x2, 3x3):
// [ 1   0  -1   0 ]
// [ 0   1   1   0 ]
// [ 0  -1   1   0 ]
// [ 0   1   0  -1 ]
const B: [[f64; 4]; 4] = [
    [1.0, 0.0, -1.0, 0.0],
    [0.0, 1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0, -1.0],
];

// G for F(2x2, 3x3):
// [ 1     0     0   ]
// [ 1/2   1/2   1/2 ]
// [ 1/2  -1/2   1/2 ]
// [ 0     0     1   ]
const G: [[f64; 3]; 4] = [
    [1.0, 0.0, 0.0],
    [0.5, 0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.0, 0.0, 1.0],
];

// A for F(2x2, 3x3):
// [ 1  1  1  0 ]
// [ 0  1 -1 -1 ]
const A: [[f64; 4]; 2] = [[1.0, 1.0, 1.0, 0.0], [0.0, 1.0, -1.0, -1.0]];

/// Input tile rows/cols.
pub const TILE_SIZE: usize = 4;
/// Filter rows/cols.
pub const FILTER_SIZE: usize = 3;
/// Output tile rows/cols.
pub const OUTPUT_SIZE: usize = TILE_SIZE - FILTER_SIZE + 1;

/// One `left * operand * right` stage and its intermediate `operand * right`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transform {
    pub left: Matrix,
    pub operand: Matrix,
    pub right: Matrix,
    pub intermediate: Matrix,
    pub result: Matrix,
}

/// Every product of one Winograd tile evaluation, plus the direct reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
    pub input_transform: Transform,
    pub filter_transform: Transform,
    pub product: Matrix,
    pub inverse_transform: Transform,
    pub direct: Matrix,
}

impl Pipeline {
    pub fn output(&self) -> &Matrix {
        &self.inverse_transform.result
    }

    /// Whether the Winograd output equals the direct correlation within `tol`.
    pub fn matches_direct(&self, tol: f64) -> bool {
        self.output().approx_eq(&self.direct, tol)
    }
}

/// Holds the transform constants and rounding settings. Stateless otherwise:
/// Input and Filter are passed into every call.
#[derive(Debug, Clone)]
pub struct WinogradEngine {
    config: EngineConfig,
    b: Matrix,
    bt: Matrix,
    g: Matrix,
    gt: Matrix,
    a: Matrix,
    at: Matrix,
}

impl Default for WinogradEngine {
    fn default() -> Self {
        WinogradEngine::new()
    }
}

impl WinogradEngine {
    pub fn new() -> Self {
        WinogradEngine::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let b = Matrix::from_array(B);
        let g = Matrix::from_array(G);
        let a = Matrix::from_array(A);
        WinogradEngine {
            config,
            bt: transpose(&b),
            gt: transpose(&g),
            at: transpose(&a),
            b,
            g,
            a,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn b(&self) -> &Matrix {
        &self.b
    }

    pub fn g(&self) -> &Matrix {
        &self.g
    }

    pub fn a(&self) -> &Matrix {
        &self.a
    }

    fn sandwich(&self, left: &Matrix, operand: &Matrix, right: &Matrix) -> Result<Transform> {
        let decimals = self.config.decimals;
        let (intermediate, result) = match self.config.rounding {
            RoundingPolicy::PerMultiply => {
                let inter = multiply_rounded(operand, right, decimals)?;
                let result = multiply_rounded(left, &inter, decimals)?;
                (inter, result)
            }
            RoundingPolicy::StageOutput => {
                let inter = multiply_exact(operand, right)?;
                let result = round_matrix(&multiply_exact(left, &inter)?, decimals);
                (round_matrix(&inter, decimals), result)
            }
        };
        Ok(Transform {
            left: left.clone(),
            operand: operand.clone(),
            right: right.clone(),
            intermediate,
            result,
        })
    }

    /// U = B * (input * B^T). Intermediate is `input * B^T`.
    pub fn transform_input(&self, input: &Matrix) -> Result<Transform> {
        self.sandwich(&self.b, input, &self.bt)
    }

    /// V = G * (filter * G^T). Intermediate is `filter * G^T` (3x4).
    pub fn transform_filter(&self, filter: &Matrix) -> Result<Transform> {
        self.sandwich(&self.g, filter, &self.gt)
    }

    /// M = U (.) V. Operands are already rounded, so no rounding here.
    pub fn elementwise_product(&self, u: &Matrix, v: &Matrix) -> Result<Matrix> {
        elementwise_product(u, v)
    }

    /// Y = A * (m * A^T). Intermediate is `m * A^T` (4x2).
    pub fn inverse_transform(&self, m: &Matrix) -> Result<Transform> {
        self.sandwich(&self.a, m, &self.at)
    }

    pub fn direct_convolve(&self, input: &Matrix, filter: &Matrix) -> Result<Matrix> {
        direct_convolve(input, filter)
    }

    /// Run all four stages and the direct reference.
    pub fn run(&self, input: &Matrix, filter: &Matrix) -> Result<Pipeline> {
        let input_transform = self.transform_input(input)?;
        let filter_transform = self.transform_filter(filter)?;
        let product = self.elementwise_product(&input_transform.result, &filter_transform.result)?;
        let inverse_transform = self.inverse_transform(&product)?;
        let direct = self.direct_convolve(input, filter)?;
        Ok(Pipeline {
            input_transform,
            filter_transform,
            product,
            inverse_transform,
            direct,
        })
    }

    /// Convolve one tile with the selected algorithm.
    ///
    /// Winograd only covers a 4x4 tile with a 3x3 filter; other shapes fall
    /// back to the direct path.
    pub fn convolve(&self, algorithm: ConvAlgorithm, input: &Matrix, filter: &Matrix) -> Result<Matrix> {
        let fits_tile = input.rows() == TILE_SIZE
            && input.cols() == TILE_SIZE
            && filter.rows() == FILTER_SIZE
            && filter.cols() == FILTER_SIZE;
        match algorithm {
            ConvAlgorithm::Winograd if fits_tile => {
                let u = self.transform_input(input)?.result;
                let v = self.transform_filter(filter)?.result;
                let m = self.elementwise_product(&u, &v)?;
                Ok(self.inverse_transform(&m)?.result)
            }
            ConvAlgorithm::Winograd | ConvAlgorithm::Direct => self.direct_convolve(input, filter),
        }
    }
}
