//! Portrait file naming and annotation list parsing.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{TrainError, TrainResult};

/// Numeric portrait id encoded in a Flickr file name.
///
/// The id is the dot-separated segment just before the extension, so
/// `../data/portraits/flickr/cropped/portraits/00074.jpg` and
/// `crop.00074.jpg` both give `74`.
pub fn flickr_id<P: AsRef<Path>>(path: P) -> TrainResult<u64> {
    let path = path.as_ref();
    let stem = path
        .file_name()
        .and_then(|s| s.to_str())
        .and_then(|name| {
            let mut segments = name.rsplit('.');
            let last = segments.next();
            segments.next().or(last)
        })
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| TrainError::NoFileStem {
            path: path.to_path_buf(),
        })?;

    stem.parse::<u64>()
        .map_err(|source| TrainError::InvalidPortraitId {
            stem: stem.to_string(),
            source,
        })
}

/// Read a whitespace separated list file, one vector of tokens per line.
///
/// Lines are trimmed before splitting; blank lines yield empty vectors.
pub fn read_lines<P: AsRef<Path>>(path: P) -> TrainResult<Vec<Vec<String>>> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let content = fs::read_to_string(&path).map_err(|source| TrainError::Io { path, source })?;

    Ok(content
        .lines()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect())
}
