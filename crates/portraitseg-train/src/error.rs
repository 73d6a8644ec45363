//! Error types specific to the portraitseg-train crate.

use std::{num::ParseIntError, path::PathBuf};

use thiserror::Error;

/// Error type for training support operations.
#[derive(Error, Debug)]
pub enum TrainError {
    /// Validation fraction outside `[0, 1]`.
    #[error("Validation fraction must lie in [0, 1], got {fraction}")]
    InvalidValidFraction {
        /// The rejected fraction.
        fraction: f64,
    },

    /// Error when reading or writing a file fails.
    #[error("I/O failure on {path}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Error when a run log row does not match the header.
    #[error("Run log {path} has {expected} columns, row has {actual}")]
    RowLengthMismatch {
        /// The run log file.
        path: PathBuf,
        /// Number of header columns.
        expected: usize,
        /// Number of fields in the rejected row.
        actual: usize,
    },

    /// Error when a run log is created without columns.
    #[error("Run log {path} needs at least one column")]
    EmptyHeader {
        /// The run log file.
        path: PathBuf,
    },

    /// Error when a file has no stem (filename without extension).
    #[error("File has no stem: {path}")]
    NoFileStem {
        /// The file path without a stem.
        path: PathBuf,
    },

    /// Error when a portrait file name is not a numeric id.
    #[error("File stem '{stem}' is not a numeric portrait id")]
    InvalidPortraitId {
        /// The stem that failed to parse.
        stem: String,
        /// The underlying parse error.
        #[source]
        source: ParseIntError,
    },
}

/// A specialized `Result` type for training support operations.
pub type TrainResult<T> = Result<T, TrainError>;
