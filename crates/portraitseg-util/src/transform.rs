//! Portrait transforms between 8-bit RGB images and mean-centered BGR model tensors.
//!
//! The forward transform mirrors the preprocessing of the pretrained backbone:
//! ```text
//! RGB u8 [H, W, 3] -> BGR -> f32 -> minus mean_bgr -> [3, H, W]
//! ```
//! The inverse transform undoes each step and narrows back to 8 bits.

use std::{fmt, str::FromStr};

use burn::tensor::{backend::Backend, Int, Tensor, TensorData};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{ImageError, ImageResult};

/// Per-channel mean of the VOC training set, in BGR order.
pub const VOC_MEAN_BGR: [f64; 3] = [104.00698793, 116.66876762, 122.67891434];

/// Mean color profile subtracted by the forward transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeanProfile {
    /// VOC mean, the convention of the pretrained portrait model.
    #[default]
    Voc,
}

impl MeanProfile {
    /// Mean color vector in BGR order.
    pub const fn mean_bgr(self) -> [f64; 3] {
        match self {
            Self::Voc => VOC_MEAN_BGR,
        }
    }

    fn mean_tensor<B: Backend>(self, device: &B::Device) -> Tensor<B, 3> {
        let [b, g, r] = self.mean_bgr();
        Tensor::<B, 1>::from_floats([b as f32, g as f32, r as f32], device).reshape([1, 1, 3])
    }
}

impl FromStr for MeanProfile {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "voc" => Ok(Self::Voc),
            other => Err(ImageError::UnsupportedProfile {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MeanProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Voc => f.write_str("voc"),
        }
    }
}

/// How floating point values are narrowed back to 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Narrowing {
    /// Round to nearest, then clamp to `[0, 255]`.
    #[default]
    Saturate,
    /// Truncate toward zero and wrap modulo 256, like an unsigned integer cast.
    Wrap,
}

impl Narrowing {
    /// Narrow a single channel value.
    pub fn narrow(self, value: f32) -> u8 {
        match self {
            // NaN maps to 0 through the saturating float cast
            Self::Saturate => value.round().clamp(0.0, 255.0) as u8,
            Self::Wrap => (value.trunc() as i64).rem_euclid(256) as u8,
        }
    }
}

impl FromStr for Narrowing {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saturate" => Ok(Self::Saturate),
            "wrap" => Ok(Self::Wrap),
            other => Err(ImageError::UnsupportedNarrowing {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Narrowing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saturate => f.write_str("saturate"),
            Self::Wrap => f.write_str("wrap"),
        }
    }
}

/// Index tensor that swaps the first and last channel (RGB <-> BGR).
fn channel_reversal<B: Backend>(device: &B::Device) -> Tensor<B, 1, Int> {
    Tensor::from_ints([2, 1, 0], device)
}

fn rgb_bytes_to_tensor<B: Backend>(
    data: &[u8],
    height: usize,
    width: usize,
    profile: MeanProfile,
    device: &B::Device,
) -> Tensor<B, 3> {
    let pixels: Vec<f32> = data.iter().copied().map(f32::from).collect();
    let rgb = Tensor::<B, 3>::from_data(
        TensorData::new(pixels, [height, width, 3]).convert::<B::FloatElem>(),
        device,
    );

    let bgr = rgb.select(2, channel_reversal::<B>(device));
    (bgr - profile.mean_tensor::<B>(device)).permute([2, 0, 1])
}

/// Convert an RGB portrait into a mean-centered BGR tensor.
///
/// # Returns
/// Tensor of shape `[3, height, width]`, unbounded and centered near zero.
pub fn transform_portrait<B: Backend>(
    image: &RgbImage,
    profile: MeanProfile,
    device: &B::Device,
) -> Tensor<B, 3> {
    let (width, height) = image.dimensions();
    rgb_bytes_to_tensor(
        image.as_raw(),
        height as usize,
        width as usize,
        profile,
        device,
    )
}

/// Convert raw interleaved pixel data into a mean-centered BGR tensor.
///
/// # Arguments
/// * `data` - Interleaved RGB bytes, row-major
/// * `height` - Image height
/// * `width` - Image width
/// * `channels` - Channel count of `data`; must be 3
///
/// # Returns
/// Tensor of shape `[3, height, width]`
pub fn transform_portrait_raw<B: Backend>(
    data: &[u8],
    height: usize,
    width: usize,
    channels: usize,
    profile: MeanProfile,
    device: &B::Device,
) -> ImageResult<Tensor<B, 3>> {
    if channels != 3 {
        return Err(ImageError::InvalidImageChannels { actual: channels });
    }

    // Overflowing dimensions can never match a real buffer.
    let expected = height
        .checked_mul(width)
        .and_then(|n| n.checked_mul(channels))
        .unwrap_or(usize::MAX);
    if data.len() != expected {
        return Err(ImageError::DataLengthMismatch {
            expected,
            actual: data.len(),
        });
    }

    Ok(rgb_bytes_to_tensor(data, height, width, profile, device))
}

/// Transform several equally sized portraits into one batch.
///
/// # Returns
/// Tensor of shape `[batch, 3, height, width]`
pub fn transform_portrait_batch<B: Backend>(
    images: &[RgbImage],
    profile: MeanProfile,
    device: &B::Device,
) -> ImageResult<Tensor<B, 4>> {
    let first = images.first().ok_or(ImageError::EmptyBatch)?;
    let (expected_width, expected_height) = first.dimensions();

    let mut tensors = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let (width, height) = image.dimensions();
        if width != expected_width || height != expected_height {
            return Err(ImageError::InconsistentImageDimensions {
                index,
                actual_height: height as usize,
                actual_width: width as usize,
                expected_height: expected_height as usize,
                expected_width: expected_width as usize,
            });
        }
        tensors.push(transform_portrait(image, profile, device));
    }

    tracing::debug!(
        batch = tensors.len(),
        height = expected_height,
        width = expected_width,
        "transformed portrait batch"
    );

    Ok(Tensor::stack(tensors, 0))
}

/// Invert [`transform_portrait`] for display.
///
/// # Arguments
/// * `tensor` - BGR tensor of shape `[3, height, width]`
/// * `profile` - Mean profile used by the forward transform
/// * `narrowing` - Rule for converting out-of-range values to 8 bits
pub fn detransform_portrait<B: Backend>(
    tensor: Tensor<B, 3>,
    profile: MeanProfile,
    narrowing: Narrowing,
) -> ImageResult<RgbImage> {
    let [channels, height, width] = tensor.dims();
    if channels != 3 {
        return Err(ImageError::InvalidImageChannels { actual: channels });
    }

    let device = tensor.device();
    let bgr = tensor.permute([1, 2, 0]) + profile.mean_tensor::<B>(&device);
    let rgb = bgr.select(2, channel_reversal::<B>(&device));

    let values = rgb
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| ImageError::TensorConversionError {
            reason: format!("{e:?}"),
        })?;

    let bytes: Vec<u8> = values.into_iter().map(|v| narrowing.narrow(v)).collect();
    RgbImage::from_raw(width as u32, height as u32, bytes).ok_or_else(|| {
        ImageError::BufferCreationError {
            reason: "Failed to create RGB image buffer".to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use burn::tensor::Tolerance;
    use image::Rgb;

    use super::*;
    use crate::tests::TestBackend;

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 37 + y * 11) as u8,
                (x * 5 + y * 91) as u8,
                (255 - x * 13 - y) as u8,
            ])
        })
    }

    #[test]
    fn transform_reorders_channels_and_subtracts_mean() {
        let device = Default::default();
        let image = RgbImage::from_pixel(1, 1, Rgb([10, 20, 30]));

        let tensor = transform_portrait::<TestBackend>(&image, MeanProfile::Voc, &device);
        assert_eq!(tensor.dims(), [3, 1, 1]);

        let expected = TensorData::from([
            [[30.0 - 104.00698793_f32]],
            [[20.0 - 116.66876762_f32]],
            [[10.0 - 122.67891434_f32]],
        ]);
        tensor
            .into_data()
            .assert_approx_eq::<f32>(&expected, Tolerance::default());
    }

    #[test]
    fn transform_moves_channels_first() {
        let device = Default::default();
        let image = gradient_image(4, 2);

        let tensor = transform_portrait::<TestBackend>(&image, MeanProfile::Voc, &device);
        assert_eq!(tensor.dims(), [3, 2, 4]);

        // Blue channel of pixel (x=3, y=1) lands at [0, 1, 3]
        let blue = tensor
            .slice([0..1, 1..2, 3..4])
            .into_data()
            .to_vec::<f32>()
            .unwrap()[0];
        let expected = f32::from(image.get_pixel(3, 1)[2]) - 104.00698793;
        assert!((blue - expected).abs() < 1e-4);
    }

    #[test]
    fn round_trip_reproduces_image() {
        let device = Default::default();
        let image = gradient_image(7, 5);

        let tensor = transform_portrait::<TestBackend>(&image, MeanProfile::Voc, &device);
        let restored =
            detransform_portrait(tensor, MeanProfile::Voc, Narrowing::Saturate).unwrap();

        assert_eq!(restored.dimensions(), image.dimensions());
        for (a, b) in image.as_raw().iter().zip(restored.as_raw()) {
            assert!(a.abs_diff(*b) <= 1, "{a} vs {b}");
        }
    }

    #[test]
    fn raw_transform_rejects_wrong_channel_count() {
        let device = Default::default();
        let result = transform_portrait_raw::<TestBackend>(
            &[0_u8; 8],
            2,
            2,
            2,
            MeanProfile::Voc,
            &device,
        );
        assert!(matches!(
            result.unwrap_err(),
            ImageError::InvalidImageChannels { actual: 2 }
        ));
    }

    #[test]
    fn raw_transform_rejects_short_buffer() {
        let device = Default::default();
        let result = transform_portrait_raw::<TestBackend>(
            &[0_u8; 10],
            2,
            2,
            3,
            MeanProfile::Voc,
            &device,
        );
        assert!(matches!(
            result.unwrap_err(),
            ImageError::DataLengthMismatch {
                expected: 12,
                actual: 10
            }
        ));
    }

    #[test]
    fn raw_transform_rejects_overflowing_dimensions() {
        let device = Default::default();
        let result = transform_portrait_raw::<TestBackend>(
            &[0_u8; 12],
            usize::MAX,
            2,
            3,
            MeanProfile::Voc,
            &device,
        );
        assert!(matches!(
            result.unwrap_err(),
            ImageError::DataLengthMismatch {
                expected: usize::MAX,
                actual: 12
            }
        ));
    }

    #[test]
    fn batch_transform_stacks_images() {
        let device = Default::default();
        let images = vec![gradient_image(3, 2), gradient_image(3, 2)];

        let batch =
            transform_portrait_batch::<TestBackend>(&images, MeanProfile::Voc, &device).unwrap();
        assert_eq!(batch.dims(), [2, 3, 2, 3]);
    }

    #[test]
    fn batch_transform_rejects_mixed_sizes() {
        let device = Default::default();
        let images = vec![gradient_image(3, 2), gradient_image(2, 2)];

        let result = transform_portrait_batch::<TestBackend>(&images, MeanProfile::Voc, &device);
        assert!(matches!(
            result.unwrap_err(),
            ImageError::InconsistentImageDimensions { index: 1, .. }
        ));

        let result = transform_portrait_batch::<TestBackend>(&[], MeanProfile::Voc, &device);
        assert!(matches!(result.unwrap_err(), ImageError::EmptyBatch));
    }

    #[test]
    fn detransform_rejects_non_rgb_tensor() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 3>::zeros([4, 2, 2], &device);

        let result = detransform_portrait(tensor, MeanProfile::Voc, Narrowing::Saturate);
        assert!(matches!(
            result.unwrap_err(),
            ImageError::InvalidImageChannels { actual: 4 }
        ));
    }

    #[test]
    fn unknown_profile_is_rejected() {
        assert_eq!("voc".parse::<MeanProfile>().unwrap(), MeanProfile::Voc);
        let err = "imagenet".parse::<MeanProfile>().unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedProfile { ref name } if name == "imagenet"));
        assert_eq!(
            err.to_string(),
            "unsupported mean profile 'imagenet' (supported: voc)"
        );
    }

    #[test]
    fn unknown_narrowing_is_rejected() {
        assert_eq!("wrap".parse::<Narrowing>().unwrap(), Narrowing::Wrap);
        let err = "clip".parse::<Narrowing>().unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedNarrowing { ref name } if name == "clip"));
        assert_eq!(
            err.to_string(),
            "unsupported narrowing mode 'clip' (supported: saturate, wrap)"
        );
    }

    #[test]
    fn narrowing_saturates_or_wraps_out_of_range_values() {
        assert_eq!(Narrowing::Saturate.narrow(-3.5), 0);
        assert_eq!(Narrowing::Saturate.narrow(300.0), 255);
        assert_eq!(Narrowing::Saturate.narrow(199.99998), 200);

        assert_eq!(Narrowing::Wrap.narrow(-3.5), 253);
        assert_eq!(Narrowing::Wrap.narrow(300.0), 44);
        assert_eq!(Narrowing::Wrap.narrow(199.99998), 199);
    }

    #[test]
    fn detransform_out_of_range_follows_narrowing() {
        let device = Default::default();
        // B above and R below range once the mean is added back
        let tensor = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[200.0_f32]], [[0.0]], [[-200.0]]]),
            &device,
        );

        let saturated =
            detransform_portrait(tensor.clone(), MeanProfile::Voc, Narrowing::Saturate).unwrap();
        // RGB order: red = -200 + 122.68, green = 116.67, blue = 200 + 104.01
        assert_eq!(saturated.get_pixel(0, 0).0, [0, 117, 255]);

        let wrapped = detransform_portrait(tensor, MeanProfile::Voc, Narrowing::Wrap).unwrap();
        assert_eq!(wrapped.get_pixel(0, 0).0, [179, 116, 48]);
    }
}
