//! Conversions from model outputs and label maps to displayable masks.

use burn::tensor::{backend::Backend, Int, Tensor};
use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::error::{ImageError, ImageResult};

/// Convert a per-pixel class score tensor into a gray mask.
///
/// Each pixel takes the arg-max class index scaled into `[0, 255]`:
/// `value = argmax * 255 / (classes - 1)`. In the binary case background is 0
/// and foreground is 255. Ties resolve to the lowest class index.
///
/// # Arguments
/// * `scores` - Tensor of shape `[classes, height, width]`
pub fn score_tensor_to_mask<B: Backend>(scores: Tensor<B, 3>) -> ImageResult<GrayImage> {
    let [classes, height, width] = scores.dims();
    if classes == 0 {
        return Err(ImageError::EmptyClassDimension);
    }

    let values = scores
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| ImageError::TensorConversionError {
            reason: format!("{e:?}"),
        })?;

    let plane = height * width;
    let scale = if classes > 1 {
        255.0 / (classes - 1) as f64
    } else {
        0.0
    };

    let pixels: Vec<u8> = (0..plane)
        .map(|pixel| {
            let mut best_class = 0;
            let mut best_score = values[pixel];
            for class in 1..classes {
                let score = values[class * plane + pixel];
                if score > best_score {
                    best_class = class;
                    best_score = score;
                }
            }
            (best_class as f64 * scale).round() as u8
        })
        .collect();

    GrayImage::from_raw(width as u32, height as u32, pixels).ok_or_else(|| {
        ImageError::BufferCreationError {
            reason: "Failed to create grayscale image buffer".to_string(),
        }
    })
}

/// Convert an integer label map into a binary display mask.
///
/// Labels of 1 or more become 255. Background (0) and ignored pixels (negative
/// sentinel labels) become 0.
///
/// # Arguments
/// * `labels` - Tensor of shape `[height, width]`
pub fn detransform_mask<B: Backend>(labels: Tensor<B, 2, Int>) -> ImageResult<GrayImage> {
    let [height, width] = labels.dims();

    let values = labels
        .into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .map_err(|e| ImageError::TensorConversionError {
            reason: format!("{e:?}"),
        })?;

    let pixels: Vec<u8> = values
        .into_iter()
        .map(|label| if label > 0 { 255 } else { 0 })
        .collect();

    GrayImage::from_raw(width as u32, height as u32, pixels).ok_or_else(|| {
        ImageError::BufferCreationError {
            reason: "Failed to create grayscale image buffer".to_string(),
        }
    })
}

/// Replicate a gray mask into three identical RGB channels.
pub fn gray_to_rgb(mask: &GrayImage) -> RgbImage {
    RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        let Luma([value]) = *mask.get_pixel(x, y);
        Rgb([value, value, value])
    })
}

#[cfg(test)]
mod tests {
    use burn::tensor::TensorData;

    use super::*;
    use crate::tests::TestBackend;

    #[test]
    fn foreground_scores_give_white_mask() {
        let device = Default::default();
        let scores = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[0.1, 0.2], [-1.0, 0.0]], [[0.9, 0.3], [2.0, 0.5]]]),
            &device,
        );

        let mask = score_tensor_to_mask(scores).unwrap();
        assert_eq!(mask.dimensions(), (2, 2));
        assert!(mask.pixels().all(|p| p.0 == [255]));
    }

    #[test]
    fn background_scores_give_black_mask() {
        let device = Default::default();
        let scores = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[0.9, 0.3, 4.0]], [[0.1, 0.2, -4.0]]]),
            &device,
        );

        let mask = score_tensor_to_mask(scores).unwrap();
        assert_eq!(mask.dimensions(), (3, 1));
        assert!(mask.pixels().all(|p| p.0 == [0]));
    }

    #[test]
    fn ties_resolve_to_lowest_class() {
        let device = Default::default();
        let scores = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[0.5, 0.1]], [[0.5, 0.7]]]),
            &device,
        );

        let mask = score_tensor_to_mask(scores).unwrap();
        assert_eq!(mask.as_raw(), &vec![0, 255]);
    }

    #[test]
    fn multi_class_scores_spread_over_display_range() {
        let device = Default::default();
        let scores = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[3.0, 0.0, 0.0]], [[0.0, 3.0, 0.0]], [[0.0, 0.0, 3.0]]]),
            &device,
        );

        let mask = score_tensor_to_mask(scores).unwrap();
        assert_eq!(mask.as_raw(), &vec![0, 128, 255]);
    }

    #[test]
    fn single_class_scores_give_black_mask() {
        let device = Default::default();
        let scores = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[5.0, -1.0], [0.0, 9.0]]]),
            &device,
        );

        let mask = score_tensor_to_mask(scores).unwrap();
        assert_eq!(mask.dimensions(), (2, 2));
        assert!(mask.pixels().all(|p| p.0 == [0]));
    }

    #[test]
    fn empty_class_dimension_is_rejected() {
        let device = Default::default();
        let scores = Tensor::<TestBackend, 3>::zeros([0, 2, 2], &device);

        assert!(matches!(
            score_tensor_to_mask(scores).unwrap_err(),
            ImageError::EmptyClassDimension
        ));
    }

    #[test]
    fn detransform_mask_maps_labels_to_binary() {
        let device = Default::default();
        let labels = Tensor::<TestBackend, 2, Int>::from_data(
            TensorData::from([[0, 1], [-1, 1]]),
            &device,
        );

        let mask = detransform_mask(labels).unwrap();
        assert_eq!(mask.as_raw(), &vec![0, 255, 0, 255]);
    }

    #[test]
    fn gray_to_rgb_replicates_channels() {
        let mask = GrayImage::from_raw(2, 1, vec![0, 200]).unwrap();
        let rgb = gray_to_rgb(&mask);
        assert_eq!(rgb.as_raw(), &vec![0, 0, 0, 200, 200, 200]);
    }
}
