//! Tile convolution: the Winograd F(2x2, 3x3) pipeline and the direct
//! correlation it is checked against.

mod naive;
mod winograd;

pub use naive::{direct_convolve, window_sum};
pub use winograd::{
    Pipeline, Transform, WinogradEngine, FILTER_SIZE, OUTPUT_SIZE, TILE_SIZE,
};

/// Selects which convolution algorithm computes a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvAlgorithm {
    /// Sliding-window correlation, 9 multiplications per output cell.
    Direct,
    /// Winograd F(2x2, 3x3). Falls back to Direct for anything but a 4x4 tile
    /// with a 3x3 filter.
    Winograd,
}
