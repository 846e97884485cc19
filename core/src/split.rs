//! Reproducible train/test partitioning.

use crate::{
    error::{PricingError, PricingResult},
    rng::SeededRng,
    types::RowIdx,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<RowIdx>,
    pub test:  Vec<RowIdx>,
}

/// Shuffle `0..n_rows` with `seed` and hold out `ceil(test_size * n)`
/// rows, taken from the front of the permutation, for testing.
pub fn train_test_split(n_rows: usize, test_size: f64, seed: u64) -> PricingResult<TrainTestSplit> {
    let n_test = (test_size * n_rows as f64).ceil() as usize;
    if !(0.0..1.0).contains(&test_size) || n_test == 0 || n_test >= n_rows {
        return Err(PricingError::EmptySplit { n_rows, test_size });
    }
    let mut rng = SeededRng::new(seed).with_name("train_test_split");
    let perm = rng.permutation(n_rows);
    let (test, train) = perm.split_at(n_test);
    log::debug!(
        "{}: {} train / {} test rows (seed {seed})",
        rng.name,
        train.len(),
        test.len()
    );
    Ok(TrainTestSplit { train: train.to_vec(), test: test.to_vec() })
}
