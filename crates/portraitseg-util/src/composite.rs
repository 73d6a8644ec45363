//! Mask compositing for visual comparison of predictions and ground truth.

use image::{GrayImage, RgbImage};

use crate::error::{ImageError, ImageResult};

/// Composite a portrait over black using a gray mask as alpha.
///
/// With `background` set the region outside the mask is kept instead. An
/// `opacity` below 1 blends the untouched portrait back in:
/// `out = image * (1 - opacity) + composite * opacity`.
///
/// # Arguments
/// * `image` - Portrait
/// * `mask` - Alpha mask of the same size, 255 = fully inside
/// * `opacity` - Weight of the composite in `[0, 1]`
/// * `background` - Keep the area outside the mask rather than inside
pub fn mask_image(
    image: &RgbImage,
    mask: &GrayImage,
    opacity: f32,
    background: bool,
) -> ImageResult<RgbImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(ImageError::DimensionMismatch {
            image_height: image.height(),
            image_width: image.width(),
            mask_height: mask.height(),
            mask_width: mask.width(),
        });
    }
    if !(0.0..=1.0).contains(&opacity) {
        return Err(ImageError::InvalidOpacity { opacity });
    }

    let mut output = image.clone();
    for (out, alpha) in output.pixels_mut().zip(mask.pixels()) {
        let mut alpha = f32::from(alpha[0]) / 255.0;
        if background {
            alpha = 1.0 - alpha;
        }
        for channel in out.0.iter_mut() {
            let original = f32::from(*channel);
            let composite = original * alpha;
            let blended = original * (1.0 - opacity) + composite * opacity;
            *channel = blended.round().clamp(0.0, 255.0) as u8;
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use image::{Luma, Rgb};

    use super::*;

    fn half_mask() -> GrayImage {
        GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 255 } else { 0 }]))
    }

    #[test]
    fn foreground_composite_blacks_out_background() {
        let image = RgbImage::from_pixel(2, 1, Rgb([100, 150, 200]));

        let out = mask_image(&image, &half_mask(), 1.0, false).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [100, 150, 200]);
        assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn background_composite_inverts_mask() {
        let image = RgbImage::from_pixel(2, 1, Rgb([100, 150, 200]));

        let out = mask_image(&image, &half_mask(), 1.0, true).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [100, 150, 200]);
    }

    #[test]
    fn partial_opacity_blends_with_original() {
        let image = RgbImage::from_pixel(2, 1, Rgb([100, 150, 200]));

        let out = mask_image(&image, &half_mask(), 0.5, false).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [100, 150, 200]);
        assert_eq!(out.get_pixel(1, 0).0, [50, 75, 100]);
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let image = RgbImage::new(3, 3);
        let mask = GrayImage::new(2, 3);

        assert!(matches!(
            mask_image(&image, &mask, 1.0, false).unwrap_err(),
            ImageError::DimensionMismatch { .. }
        ));
    }

    #[test]
    fn opacity_out_of_range_is_rejected() {
        let image = RgbImage::new(2, 1);

        assert!(matches!(
            mask_image(&image, &half_mask(), 1.5, false).unwrap_err(),
            ImageError::InvalidOpacity { .. }
        ));
    }
}
