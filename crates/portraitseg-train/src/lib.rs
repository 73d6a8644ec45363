//! Training support for portrait segmentation.
//!
//! Deterministic train/validation splits, an append-only CSV run log, and
//! parsing of portrait file names and annotation lists.

pub mod error;
pub mod naming;
pub mod run_log;
pub mod split;

pub use error::{TrainError, TrainResult};
pub use naming::{flickr_id, read_lines};
pub use run_log::RunLog;
pub use split::{split_train_val, TrainValSplit};
