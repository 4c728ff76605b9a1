//! Cell-highlight animation model.
//!
//! A [`Frame`] names the cells a renderer marks active at one tick: the
//! operand cells that contribute to a target cell, and the target itself.
//! Frames are precomputed from engine results; [`Animation`] walks them with
//! a pausable cursor and hands each one to a [`FrameSink`].

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::conv::{window_sum, Transform};
use crate::error::{Result, WinogradError};
use crate::matrix::{Matrix, Shape};

/// The on-screen matrix a highlighted cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    Input,
    Filter,
    B,
    BT,
    G,
    GT,
    A,
    AT,
    /// `input * B^T`
    InputBT,
    /// `filter * G^T`
    FilterGT,
    /// `M * A^T`
    ProductAT,
    U,
    V,
    M,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellRef {
    pub slot: Slot,
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(slot: Slot, row: usize, col: usize) -> Self {
        CellRef { slot, row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub label: &'static str,
    pub operands: Vec<CellRef>,
    pub target: CellRef,
    /// Value of the target cell once this frame's contribution is complete.
    pub value: Option<f64>,
}

impl Frame {
    /// Every active cell: operands first, then the target.
    pub fn highlights(&self) -> impl Iterator<Item = &CellRef> {
        self.operands.iter().chain(std::iter::once(&self.target))
    }
}

/// Slots for the three matrices of one product `left * right = target`.
#[derive(Debug, Clone, Copy)]
pub struct ProductSlots {
    pub left: Slot,
    pub right: Slot,
    pub target: Slot,
}

/// Frames for `a * b`, one per output cell in row-major order.
///
/// The frame for `result[i][j]` lists `a[i][k]` for k ascending, then
/// `b[k][j]` for k ascending: the order [`crate::matrix::multiply`]
/// accumulates in.
pub fn multiply_trace(a: Shape, b: Shape, slots: ProductSlots, label: &'static str) -> Result<Vec<Frame>> {
    if a.cols != b.rows {
        return Err(WinogradError::DimensionMismatch {
            op: "multiply_trace",
            left: a,
            right: b,
        });
    }
    let mut frames = Vec::with_capacity(a.rows * b.cols);
    for i in 0..a.rows {
        for j in 0..b.cols {
            let mut operands = Vec::with_capacity(2 * a.cols);
            operands.extend((0..a.cols).map(|k| CellRef::new(slots.left, i, k)));
            operands.extend((0..a.cols).map(|k| CellRef::new(slots.right, k, j)));
            frames.push(Frame {
                label,
                operands,
                target: CellRef::new(slots.target, i, j),
                value: None,
            });
        }
    }
    Ok(frames)
}

fn with_values(mut frames: Vec<Frame>, values: &Matrix) -> Vec<Frame> {
    for frame in &mut frames {
        frame.value = Some(values.get(frame.target.row, frame.target.col));
    }
    frames
}

/// Slot names and phase labels for one sandwich transform.
#[derive(Debug, Clone, Copy)]
pub struct TransformLayout {
    pub operand: Slot,
    pub right: Slot,
    pub intermediate: Slot,
    pub left: Slot,
    pub result: Slot,
    pub labels: [&'static str; 2],
}

impl TransformLayout {
    pub const INPUT: TransformLayout = TransformLayout {
        operand: Slot::Input,
        right: Slot::BT,
        intermediate: Slot::InputBT,
        left: Slot::B,
        result: Slot::U,
        labels: ["input x B^T", "B x (input x B^T)"],
    };

    pub const FILTER: TransformLayout = TransformLayout {
        operand: Slot::Filter,
        right: Slot::GT,
        intermediate: Slot::FilterGT,
        left: Slot::G,
        result: Slot::V,
        labels: ["filter x G^T", "G x (filter x G^T)"],
    };

    pub const INVERSE: TransformLayout = TransformLayout {
        operand: Slot::M,
        right: Slot::AT,
        intermediate: Slot::ProductAT,
        left: Slot::A,
        result: Slot::Output,
        labels: ["M x A^T", "A x (M x A^T)"],
    };
}

/// Two phases: `operand * right -> intermediate`, then
/// `left * intermediate -> result`.
pub fn transform_frames(t: &Transform, layout: &TransformLayout) -> Result<Vec<Frame>> {
    let first = multiply_trace(
        t.operand.shape(),
        t.right.shape(),
        ProductSlots {
            left: layout.operand,
            right: layout.right,
            target: layout.intermediate,
        },
        layout.labels[0],
    )?;
    let second = multiply_trace(
        t.left.shape(),
        t.intermediate.shape(),
        ProductSlots {
            left: layout.left,
            right: layout.intermediate,
            target: layout.result,
        },
        layout.labels[1],
    )?;
    let mut frames = with_values(first, &t.intermediate);
    frames.extend(with_values(second, &t.result));
    Ok(frames)
}

/// One frame per cell of `M = U (.) V`.
pub fn elementwise_frames(product: &Matrix) -> Vec<Frame> {
    let Shape { rows, cols } = product.shape();
    let mut frames = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            frames.push(Frame {
                label: "U (.) V",
                operands: vec![CellRef::new(Slot::U, r, c), CellRef::new(Slot::V, r, c)],
                target: CellRef::new(Slot::M, r, c),
                value: Some(product.get(r, c)),
            });
        }
    }
    frames
}

/// One frame per filter position, row-major, highlighting the input window
/// under the filter and the output cell it produces.
pub fn convolution_frames(input: &Matrix, filter: &Matrix) -> Result<Vec<Frame>> {
    if filter.rows() > input.rows() || filter.cols() > input.cols() {
        return Err(WinogradError::DimensionMismatch {
            op: "convolution_frames",
            left: input.shape(),
            right: filter.shape(),
        });
    }
    let out_h = input.rows() - filter.rows() + 1;
    let out_w = input.cols() - filter.cols() + 1;
    let mut frames = Vec::with_capacity(out_h * out_w);
    for row in 0..out_h {
        for col in 0..out_w {
            let mut operands = Vec::with_capacity(filter.shape().len());
            for i in 0..filter.rows() {
                for j in 0..filter.cols() {
                    operands.push(CellRef::new(Slot::Input, row + i, col + j));
                }
            }
            frames.push(Frame {
                label: "direct convolution",
                operands,
                target: CellRef::new(Slot::Output, row, col),
                value: Some(window_sum(input, filter, row, col)),
            });
        }
    }
    Ok(frames)
}

/// Receives frames as an animation advances.
pub trait FrameSink {
    fn on_frame(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> FrameSink for F {
    fn on_frame(&mut self, frame: &Frame) {
        self(frame)
    }
}

/// A pausable cursor over a frame sequence.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<Frame>,
    cursor: usize,
    playing: bool,
    interval: Duration,
}

impl Animation {
    /// Starts paused at the first frame.
    pub fn new(frames: Vec<Frame>, interval: Duration) -> Self {
        Animation {
            frames,
            cursor: 0,
            playing: false,
            interval,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    pub fn play(&mut self) {
        if self.is_finished() {
            return;
        }
        debug!(position = self.cursor, total = self.frames.len(), "animation playing");
        self.playing = true;
    }

    pub fn pause(&mut self) {
        if self.playing {
            debug!(position = self.cursor, "animation paused");
        }
        self.playing = false;
    }

    /// Flip between playing and paused. Returns whether it is now playing.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
        self.playing
    }

    pub fn restart(&mut self) {
        self.cursor = 0;
        self.playing = false;
    }

    /// The most recently emitted frame.
    pub fn current(&self) -> Option<&Frame> {
        self.cursor.checked_sub(1).and_then(|i| self.frames.get(i))
    }

    /// Emit the next frame if playing. Stops itself after the last frame.
    pub fn tick(&mut self) -> Option<&Frame> {
        if !self.playing || self.is_finished() {
            return None;
        }
        let idx = self.cursor;
        self.cursor += 1;
        if self.is_finished() {
            self.playing = false;
            debug!(frames = self.frames.len(), "animation complete");
        }
        let frame = &self.frames[idx];
        trace!(idx, label = frame.label, row = frame.target.row, col = frame.target.col, "frame");
        Some(frame)
    }

    /// Play to the end, calling `wait(interval)` between frames.
    ///
    /// Returns the number of frames delivered.
    pub fn run<S: FrameSink + ?Sized>(&mut self, sink: &mut S, mut wait: impl FnMut(Duration)) -> usize {
        self.play();
        let interval = self.interval;
        let mut delivered = 0;
        while let Some(frame) = self.tick() {
            sink.on_frame(frame);
            delivered += 1;
            if self.is_finished() {
                break;
            }
            wait(interval);
        }
        delivered
    }
}
