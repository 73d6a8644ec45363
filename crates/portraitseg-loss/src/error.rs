//! Error types for masked loss and metric computation.

use thiserror::Error;

/// Error type for masked loss and accuracy computation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LossError {
    /// Score and label tensors disagree on batch or spatial size.
    #[error("shape mismatch: scores {scores:?} [N, C, H, W] vs targets {targets:?} [N, H, W]")]
    ShapeMismatch {
        /// Shape of the score tensor.
        scores: [usize; 4],
        /// Shape of the label tensor.
        targets: [usize; 3],
    },

    /// Class weight vector length differs from the class count.
    #[error("class weight vector has {actual} entries, scores have {expected} classes")]
    WeightLengthMismatch {
        /// Number of classes in the score tensor.
        expected: usize,
        /// Number of class weights.
        actual: usize,
    },

    /// A label is not a valid class index.
    #[error("label {label} is out of range for {num_classes} classes")]
    LabelOutOfRange {
        /// Largest label found.
        label: i64,
        /// Number of classes in the score tensor.
        num_classes: usize,
    },

    /// Every pixel carries the ignore sentinel, so there is nothing to average.
    #[error("no valid labels: every pixel is marked as ignored")]
    EmptySelection,
}

/// A specialized `Result` type for loss operations.
pub type LossResult<T> = Result<T, LossError>;
