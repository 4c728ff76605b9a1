//! Numeric engine and step model for a Winograd F(2x2, 3x3) convolution
//! walkthrough.
//!
//! The engine transforms a 4x4 input tile and a 3x3 filter, multiplies them
//! elementwise and inverse-transforms the product into a 2x2 output, keeping
//! every intermediate matrix so a renderer can show it. A direct correlation
//! is computed alongside as the reference.
//!
//! # Example
//!
//! ```
//! use winograd_viz::conv::WinogradEngine;
//! use winograd_viz::session::WinogradState;
//!
//! let engine = WinogradEngine::new();
//! let state = WinogradState::default();
//! let pipeline = engine.run(state.input(), state.filter()).unwrap();
//! assert!(pipeline.matches_direct(1e-3));
//! ```

/// Engine and animation settings.
pub mod config;
/// Winograd pipeline and direct reference convolution.
pub mod conv;
/// Error type shared by every fallible operation.
pub mod error;
/// Dense `f64` matrix and the primitive operations on it.
pub mod matrix;
/// Walkthrough state, steps and highlight animations.
pub mod session;

pub use error::{Result, WinogradError};
