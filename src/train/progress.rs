use serde::Serialize;

use crate::encoding::bits::BitSequence;

/// Snapshot emitted by `train_loop` every `report_every` iterations.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the loop
/// sends one `ProgressReport` per report; it is also logged through
/// `tracing` and can be printed as a JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    /// 0-based index of the training call this report describes.
    pub iteration: usize,
    /// Total iterations requested for this run.
    pub total_iterations: usize,
    /// `total_error` returned by that training call (summed over timesteps).
    pub total_error: f64,
    /// Mean `total_error` since the previous report.
    pub window_error: f64,
    pub a: u64,
    pub b: u64,
    pub target: BitSequence,
    /// Prediction made during training, before the update.
    pub guess: BitSequence,
    /// `guess` decoded back to an integer.
    pub decoded_guess: u64,
    /// Separate `predict` call on the same operands, after the update.
    pub prediction: BitSequence,
    /// Wall-clock time since the loop started, in milliseconds.
    pub elapsed_ms: u64,
}
