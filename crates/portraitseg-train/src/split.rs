//! Train/validation index splitting.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{TrainError, TrainResult};

/// Sample indices assigned to the training and validation sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainValSplit {
    /// Training indices.
    pub train: Vec<usize>,
    /// Validation indices.
    pub valid: Vec<usize>,
}

/// Split `0..count` into training and validation indices.
///
/// The first `floor(valid_fraction * count)` indices go to validation and the rest
/// to training. With `shuffle_seed` set, indices are shuffled first using a
/// `StdRng` seeded from it, so the same seed always yields the same split.
pub fn split_train_val(
    count: usize,
    valid_fraction: f64,
    shuffle_seed: Option<u64>,
) -> TrainResult<TrainValSplit> {
    if !(0.0..=1.0).contains(&valid_fraction) {
        return Err(TrainError::InvalidValidFraction {
            fraction: valid_fraction,
        });
    }

    let mut indices: Vec<usize> = (0..count).collect();
    if let Some(seed) = shuffle_seed {
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    }

    let split = (valid_fraction * count as f64).floor() as usize;
    let train = indices.split_off(split);

    tracing::debug!(
        train = train.len(),
        valid = indices.len(),
        shuffled = shuffle_seed.is_some(),
        "split dataset indices"
    );

    Ok(TrainValSplit {
        train,
        valid: indices,
    })
}
