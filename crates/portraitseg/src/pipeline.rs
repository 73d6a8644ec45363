//! File-level pipelines behind the command-line tool.

use std::path::Path;

use anyhow::{Context, Result};
use burn::tensor::{backend::Backend, ElementConversion};
use image::RgbImage;
use portraitseg_util::{
    detransform_portrait, mask_image, transform_portrait, MeanProfile, Narrowing,
};

/// Statistics of a forward/inverse transform round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTripReport {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Smallest value of the model tensor.
    pub min: f32,
    /// Largest value of the model tensor.
    pub max: f32,
    /// Mean value of the model tensor.
    pub mean: f32,
    /// Largest per-channel difference between input and restored image.
    pub max_deviation: u8,
}

/// Run an image through the forward transform and back.
pub fn round_trip_image<B: Backend>(
    image: &RgbImage,
    profile: MeanProfile,
    narrowing: Narrowing,
    device: &B::Device,
) -> Result<(RgbImage, RoundTripReport)> {
    let tensor = transform_portrait::<B>(image, profile, device);

    let min: f32 = tensor.clone().min().into_scalar().elem();
    let max: f32 = tensor.clone().max().into_scalar().elem();
    let mean: f32 = tensor.clone().mean().into_scalar().elem();

    let restored = detransform_portrait(tensor, profile, narrowing)
        .context("Failed to convert tensor back to image")?;

    let max_deviation = image
        .as_raw()
        .iter()
        .zip(restored.as_raw())
        .map(|(a, b)| a.abs_diff(*b))
        .max()
        .unwrap_or(0);

    let report = RoundTripReport {
        width: image.width(),
        height: image.height(),
        min,
        max,
        mean,
        max_deviation,
    };
    Ok((restored, report))
}

/// Load `input`, round-trip it through the model transform and save the result.
pub fn round_trip_file<B: Backend>(
    input: &Path,
    output: &Path,
    profile: MeanProfile,
    narrowing: Narrowing,
    device: &B::Device,
) -> Result<RoundTripReport> {
    let image = image::open(input)
        .with_context(|| format!("Failed to open image: {}", input.display()))?
        .to_rgb8();

    let (restored, report) = round_trip_image::<B>(&image, profile, narrowing, device)?;
    restored
        .save(output)
        .with_context(|| format!("Failed to save image: {}", output.display()))?;

    Ok(report)
}

/// Overlay the mask file on the portrait file and save the composite.
pub fn composite_files(
    image_path: &Path,
    mask_path: &Path,
    output: &Path,
    opacity: f32,
    background: bool,
) -> Result<()> {
    let image = image::open(image_path)
        .with_context(|| format!("Failed to open image: {}", image_path.display()))?
        .to_rgb8();
    let mask = image::open(mask_path)
        .with_context(|| format!("Failed to open mask: {}", mask_path.display()))?
        .to_luma8();

    let composite = mask_image(&image, &mask, opacity, background)
        .context("Failed to composite mask over image")?;
    composite
        .save(output)
        .with_context(|| format!("Failed to save image: {}", output.display()))
}
