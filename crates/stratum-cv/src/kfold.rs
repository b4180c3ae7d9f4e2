//! Unstratified k-fold and leave-one-out splitting.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::error::CvError;
use crate::fold::Fold;
use crate::splitter::{Splitter, balanced_chunks};

/// Plain k-fold splitter that ignores class labels.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `shuffle` | `true`  |
/// | `seed`    | 42      |
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl KFold {
    /// Create a splitter producing `n_splits` folds.
    ///
    /// # Errors
    ///
    /// Returns [`CvError::InvalidSplitCount`] if `n_splits` < 2.
    pub fn new(n_splits: usize) -> Result<Self, CvError> {
        if n_splits < 2 {
            return Err(CvError::InvalidSplitCount { n_splits });
        }
        Ok(Self {
            n_splits,
            shuffle: true,
            seed: 42,
        })
    }

    /// Enable or disable shuffling the row order before cutting folds.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set the random seed used when shuffling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the number of folds.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }
}

impl Splitter for KFold {
    fn split(&self, labels: &[usize]) -> Result<Vec<Fold>, CvError> {
        let n_samples = labels.len();
        if self.n_splits > n_samples {
            return Err(CvError::TooManySplits {
                n_splits: self.n_splits,
                n_samples,
            });
        }

        let mut order: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            order.shuffle(&mut ChaCha8Rng::seed_from_u64(self.seed));
        }

        Ok(balanced_chunks(n_samples, self.n_splits)
            .into_iter()
            .map(|range| {
                let mut test = order[range].to_vec();
                test.sort_unstable();
                Fold::from_test(test, n_samples)
            })
            .collect())
    }
}

/// Leave-one-out splitter: fold `i` tests on row `i` alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveOneOut;

impl Splitter for LeaveOneOut {
    fn split(&self, labels: &[usize]) -> Result<Vec<Fold>, CvError> {
        let n_samples = labels.len();
        if n_samples < 2 {
            return Err(CvError::TooFewSamples {
                required: 2,
                n_samples,
            });
        }
        Ok((0..n_samples)
            .map(|i| Fold::from_test(vec![i], n_samples))
            .collect())
    }
}
