//! Image and tensor utilities for the portrait segmentation workflow.
//!
//! - [`transform`]: RGB image <-> mean-centered BGR model tensor
//! - [`mask`]: score tensors and label maps -> displayable masks
//! - [`composite`]: overlay masks on portraits

pub mod composite;
pub mod error;
pub mod mask;
pub mod transform;

pub use composite::mask_image;
pub use error::{ImageError, ImageResult};
pub use mask::{detransform_mask, gray_to_rgb, score_tensor_to_mask};
pub use transform::{
    detransform_portrait, transform_portrait, transform_portrait_batch, transform_portrait_raw,
    MeanProfile, Narrowing, VOC_MEAN_BGR,
};
