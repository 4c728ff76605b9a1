mod matrix;
mod ops;

pub use matrix::{format_value, Matrix, Shape};
pub use ops::{
    elementwise_product, multiply, multiply_exact, multiply_rounded, round_matrix, round_to,
    transpose, DISPLAY_DECIMALS, MAX_DECIMALS,
};
