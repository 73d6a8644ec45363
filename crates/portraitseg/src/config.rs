//! Configuration for the portraitseg command-line tool.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use portraitseg_util::{MeanProfile, Narrowing};
use serde::{Deserialize, Serialize};

/// Defaults for the command-line tool, optionally loaded from a JSON file.
///
/// Missing keys fall back to [`CliConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Mean color profile of the model input.
    pub profile: MeanProfile,
    /// Narrowing rule for converting tensors back to 8-bit images.
    pub narrowing: Narrowing,
    /// Weight of the composite when overlaying a mask.
    pub opacity: f32,
    /// Keep the region outside the mask when compositing.
    pub background: bool,
    /// Fraction of samples assigned to validation.
    pub valid_fraction: f64,
    /// Seed for shuffling before the split. None keeps the natural order.
    pub seed: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            profile: MeanProfile::Voc,
            narrowing: Narrowing::Saturate,
            opacity: 1.0,
            background: false,
            valid_fraction: 0.2,
            seed: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
