//! Loss functions and metrics for portrait segmentation with ignored labels.
//!
//! Labels are per-pixel class indices; a negative label marks a pixel as
//! unknown, and such pixels are left out of both the loss and the accuracy.
//!
//! - **[`MaskedCrossEntropyLoss`]**: log-softmax + NLL over the remaining pixels,
//!   with optional per-class weights
//! - **[`masked_pixel_accuracy`]**: fraction of remaining pixels predicted correctly
//!
//! ## Usage Example
//!
//! ```rust
//! use burn::{backend::NdArray, nn::loss::Reduction, prelude::*};
//! use portraitseg_loss::MaskedCrossEntropyLoss;
//!
//! let device = Default::default();
//! let loss = MaskedCrossEntropyLoss::<NdArray>::new(&device);
//!
//! let scores = Tensor::<NdArray, 4>::zeros([1, 2, 4, 4], &device);
//! let targets = Tensor::<NdArray, 3, Int>::ones([1, 4, 4], &device);
//! let value = loss.forward(scores, targets, Reduction::Mean).unwrap();
//! assert_eq!(value.dims(), [1]);
//! ```

mod accuracy;
mod cross_entropy;
mod error;
mod selection;

pub use accuracy::masked_pixel_accuracy;
pub use cross_entropy::{MaskedCrossEntropyLoss, MaskedCrossEntropyLossConfig};
pub use error::{LossError, LossResult};
