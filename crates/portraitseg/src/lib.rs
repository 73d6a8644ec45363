//! Portrait segmentation training helpers.
//!
//! This crate bundles the transform, loss and training support crates and
//! provides the file-level pipelines used by the `portraitseg` binary.

pub mod backend;
pub mod config;
pub mod pipeline;

#[doc(inline)]
pub use portraitseg_loss as loss;
#[doc(inline)]
pub use portraitseg_train as train;
#[doc(inline)]
pub use portraitseg_util as util;

pub use config::CliConfig;
pub use pipeline::{composite_files, round_trip_file, round_trip_image, RoundTripReport};
