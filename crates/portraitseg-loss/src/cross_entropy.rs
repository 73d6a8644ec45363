//! Two-dimensional cross-entropy loss with ignored labels.
//!
//! Pixels whose label is negative are excluded from both the predictions and the
//! targets. For the remaining pixels `P`:
//! ```text
//! l_p  = -w[y_p] * log_softmax(x_p)[y_p]
//! sum  = Σ l_p
//! mean = sum / |P|
//! ```
//! The mean divides by the pixel count even when class weights are set.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    nn::loss::Reduction,
    tensor::{activation::log_softmax, backend::Backend, Int, Tensor, TensorData},
};

use crate::{
    error::{LossError, LossResult},
    selection::{check_label_range, check_shapes, count_valid, valid_pixels},
};

/// Configuration for creating a [masked cross-entropy loss](MaskedCrossEntropyLoss).
#[derive(Config, Debug)]
pub struct MaskedCrossEntropyLossConfig {
    /// Per-class weights. Its length must equal the number of score channels.
    pub weights: Option<Vec<f32>>,
}

impl MaskedCrossEntropyLossConfig {
    /// Initialize [masked cross-entropy loss](MaskedCrossEntropyLoss).
    pub fn init<B: Backend>(&self, device: &B::Device) -> MaskedCrossEntropyLoss<B> {
        self.assertions();
        MaskedCrossEntropyLoss {
            weights: self.weights.as_ref().map(|weights| {
                Tensor::from_data(
                    TensorData::new(weights.clone(), [weights.len()]).convert::<B::FloatElem>(),
                    device,
                )
            }),
        }
    }

    fn assertions(&self) {
        if let Some(weights) = &self.weights {
            assert!(
                !weights.is_empty(),
                "Weights for MaskedCrossEntropyLoss must not be empty"
            );
            assert!(
                weights.iter().all(|w| *w >= 0.0),
                "Weights for MaskedCrossEntropyLoss must be non-negative, got {weights:?}"
            );
        }
    }
}

/// Cross-entropy over per-pixel class scores, skipping pixels labeled as unknown.
#[derive(Module, Debug)]
#[module(custom_display)]
pub struct MaskedCrossEntropyLoss<B: Backend> {
    /// Per-class weights, `[num_classes]`.
    pub weights: Option<Tensor<B, 1>>,
}

impl<B: Backend> ModuleDisplay for MaskedCrossEntropyLoss<B> {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        let weights = match &self.weights {
            Some(weights) => format!("Tensor<{}>", weights.dims()[0]),
            None => "None".to_string(),
        };
        content.add("weights", &weights).optional()
    }
}

impl<B: Backend> MaskedCrossEntropyLoss<B> {
    /// Create an unweighted loss.
    pub fn new(device: &B::Device) -> Self {
        MaskedCrossEntropyLossConfig::new().init(device)
    }

    /// Compute the criterion with reduction.
    ///
    /// `Mean` (and `Auto`) divides the summed loss by the number of non-ignored
    /// pixels and fails with [`LossError::EmptySelection`] when there are none.
    /// `Sum` returns the raw sum, zero when every pixel is ignored.
    ///
    /// # Shapes
    ///
    /// - scores: `[batch_size, num_classes, height, width]`
    /// - targets: `[batch_size, height, width]`, negative = ignored
    /// - output: `[1]`
    pub fn forward(
        &self,
        scores: Tensor<B, 4>,
        targets: Tensor<B, 3, Int>,
        reduction: Reduction,
    ) -> LossResult<Tensor<B, 1>> {
        let valid = self.validate(&scores, &targets)?;
        let loss = self.pixel_losses(scores, targets).sum();

        match reduction {
            Reduction::Mean | Reduction::Auto => {
                if valid == 0 {
                    tracing::warn!("masked cross-entropy called with every label ignored");
                    return Err(LossError::EmptySelection);
                }
                Ok(loss.div_scalar(valid as f64))
            }
            Reduction::Sum => Ok(loss),
        }
    }

    /// Compute the criterion without reduction.
    ///
    /// Ignored pixels hold zero.
    ///
    /// # Shapes
    ///
    /// - scores: `[batch_size, num_classes, height, width]`
    /// - targets: `[batch_size, height, width]`
    /// - output: `[batch_size, height, width]`
    pub fn forward_no_reduction(
        &self,
        scores: Tensor<B, 4>,
        targets: Tensor<B, 3, Int>,
    ) -> LossResult<Tensor<B, 3>> {
        self.validate(&scores, &targets)?;
        Ok(self.pixel_losses(scores, targets))
    }

    fn validate(&self, scores: &Tensor<B, 4>, targets: &Tensor<B, 3, Int>) -> LossResult<usize> {
        check_shapes(scores, targets)?;

        let num_classes = scores.dims()[1];
        if let Some(weights) = &self.weights {
            let [len] = weights.dims();
            if len != num_classes {
                return Err(LossError::WeightLengthMismatch {
                    expected: num_classes,
                    actual: len,
                });
            }
        }

        let valid = count_valid(targets.clone());
        if valid > 0 {
            check_label_range(targets.clone(), num_classes)?;
        }
        Ok(valid)
    }

    fn pixel_losses(&self, scores: Tensor<B, 4>, targets: Tensor<B, 3, Int>) -> Tensor<B, 3> {
        let [n, c, h, w] = scores.dims();
        let pixels = n * h * w;

        // [N, C, H, W] -> [N*H*W, C]
        let log_p = log_softmax(scores, 1)
            .permute([0, 2, 3, 1])
            .reshape([pixels, c]);
        let targets = targets.reshape([pixels]);

        let ignored = valid_pixels(targets.clone()).bool_not();
        // Ignored pixels gather class 0 and are overwritten with zero afterwards.
        let classes = targets.clamp_min(0);

        let picked = log_p
            .gather(1, classes.clone().reshape([pixels, 1]))
            .reshape([pixels]);
        let mut loss = picked.neg();

        if let Some(weights) = &self.weights {
            loss = loss * weights.clone().select(0, classes);
        }

        loss.mask_fill(ignored, 0.0).reshape([n, h, w])
    }
}
