//! Pixel accuracy over non-ignored labels.

use burn::tensor::{backend::Backend, ElementConversion, Int, Tensor};

use crate::{
    error::{LossError, LossResult},
    selection::{check_shapes, count_valid, valid_pixels},
};

/// Fraction of non-ignored pixels whose highest-scoring class equals the label.
///
/// # Shapes
///
/// - scores: `[batch_size, num_classes, height, width]`
/// - targets: `[batch_size, height, width]`, negative = ignored
pub fn masked_pixel_accuracy<B: Backend>(
    scores: Tensor<B, 4>,
    targets: Tensor<B, 3, Int>,
) -> LossResult<f64> {
    check_shapes(&scores, &targets)?;

    let valid = count_valid(targets.clone());
    if valid == 0 {
        return Err(LossError::EmptySelection);
    }

    let [n, _, h, w] = scores.dims();
    let predictions = scores.argmax(1).reshape([n, h, w]);
    let correct = predictions.equal(targets.clone()).int() * valid_pixels(targets).int();
    let correct: i64 = correct.sum().into_scalar().elem();

    Ok(correct as f64 / valid as f64)
}
