use thiserror::Error;

use crate::matrix::Shape;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WinogradError {
    #[error("Dimension mismatch in {op}: {left} vs {right}")]
    DimensionMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    #[error("Ragged matrix: row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Step {step} out of range (last step is {last})")]
    StepOutOfRange { step: usize, last: usize },
}

pub type Result<T> = std::result::Result<T, WinogradError>;
