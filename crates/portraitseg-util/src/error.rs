//! Error types for image and tensor conversion.

use thiserror::Error;

/// ImageError covers every failure in the portrait transform pipeline.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("unsupported mean profile '{name}' (supported: voc)")]
    UnsupportedProfile { name: String },

    #[error("unsupported narrowing mode '{name}' (supported: saturate, wrap)")]
    UnsupportedNarrowing { name: String },

    #[error("invalid channel count: expected 3 for image, got {actual}")]
    InvalidImageChannels { actual: usize },

    #[error("data length mismatch: expected {expected}, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    #[error("score tensor has no class channels")]
    EmptyClassDimension,

    #[error("empty image list provided for batch processing")]
    EmptyBatch,

    #[error("image {index} has dimensions {actual_height}x{actual_width}, expected {expected_height}x{expected_width}")]
    InconsistentImageDimensions {
        index: usize,
        actual_height: usize,
        actual_width: usize,
        expected_height: usize,
        expected_width: usize,
    },

    #[error(
        "dimension mismatch between image and mask: image={}x{}, mask={}x{}",
        image_height,
        image_width,
        mask_height,
        mask_width
    )]
    DimensionMismatch {
        image_height: u32,
        image_width: u32,
        mask_height: u32,
        mask_width: u32,
    },

    #[error("opacity must lie in [0, 1], got {opacity}")]
    InvalidOpacity { opacity: f32 },

    #[error("failed to convert tensor to data: {reason}")]
    TensorConversionError { reason: String },

    #[error("failed to create image buffer: {reason}")]
    BufferCreationError { reason: String },
}

/// Result type alias for ImageError
pub type ImageResult<T> = Result<T, ImageError>;
