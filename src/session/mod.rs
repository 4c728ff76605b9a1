//! Presentation-facing model: input/filter state, the step machine, and the
//! cell-highlight animations a renderer plays over engine results.

/// Frame sequences and the pausable animation cursor.
pub mod animation;
mod state;
mod steps;
mod walkthrough;

pub use animation::{Animation, CellRef, Frame, FrameSink, Slot};
pub use state::{random_matrix, MatrixKind, WinogradState};
pub use steps::Step;
pub use walkthrough::{StepView, Walkthrough};
