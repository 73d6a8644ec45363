//! Pixel selection shared by the masked loss and metrics.

use burn::tensor::{backend::Backend, Bool, ElementConversion, Int, Tensor};

use crate::error::{LossError, LossResult};

/// Check that scores `[N, C, H, W]` and targets `[N, H, W]` describe the same pixels.
pub(crate) fn check_shapes<B: Backend>(
    scores: &Tensor<B, 4>,
    targets: &Tensor<B, 3, Int>,
) -> LossResult<()> {
    let [n, _, h, w] = scores.dims();
    let [tn, th, tw] = targets.dims();
    if (n, h, w) != (tn, th, tw) {
        return Err(LossError::ShapeMismatch {
            scores: scores.dims(),
            targets: targets.dims(),
        });
    }
    Ok(())
}

/// Pixels whose label is a class index rather than the negative sentinel.
pub(crate) fn valid_pixels<const D: usize, B: Backend>(
    targets: Tensor<B, D, Int>,
) -> Tensor<B, D, Bool> {
    targets.greater_equal_elem(0)
}

/// Count of non-ignored pixels.
pub(crate) fn count_valid<const D: usize, B: Backend>(targets: Tensor<B, D, Int>) -> usize {
    let count: i64 = valid_pixels(targets).int().sum().into_scalar().elem();
    count as usize
}

/// Ensure every non-ignored label indexes one of `num_classes` classes.
///
/// Must only be called when at least one label is valid.
pub(crate) fn check_label_range<B: Backend>(
    targets: Tensor<B, 3, Int>,
    num_classes: usize,
) -> LossResult<()> {
    let label: i64 = targets.max().into_scalar().elem();
    if label >= num_classes as i64 {
        return Err(LossError::LabelOutOfRange { label, num_classes });
    }
    Ok(())
}
