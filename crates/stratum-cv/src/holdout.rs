//! Stratified single train/test split.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::error::CvError;
use crate::fold::Fold;
use crate::splitter::{Splitter, indices_by_class};

/// Stratified holdout splitter producing exactly one fold.
///
/// Each class sends `floor(test_size * n_class)` of its shuffled rows to the
/// test side. A class with at least two rows always keeps one row for training.
///
/// # Defaults
///
/// | Parameter   | Default |
/// |-------------|---------|
/// | `test_size` | 0.30    |
/// | `seed`      | 42      |
#[derive(Debug, Clone)]
pub struct StratifiedHoldout {
    test_size: f64,
    seed: u64,
}

impl StratifiedHoldout {
    /// Create a holdout splitter with the given test fraction.
    ///
    /// # Errors
    ///
    /// Returns [`CvError::InvalidTestSize`] unless `0.0 < test_size < 1.0`.
    pub fn new(test_size: f64) -> Result<Self, CvError> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(CvError::InvalidTestSize { test_size });
        }
        Ok(Self {
            test_size,
            seed: 42,
        })
    }

    /// Set the random seed for per-class shuffling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the test fraction.
    #[must_use]
    pub fn test_size(&self) -> f64 {
        self.test_size
    }
}

impl Default for StratifiedHoldout {
    fn default() -> Self {
        Self {
            test_size: 0.30,
            seed: 42,
        }
    }
}

impl Splitter for StratifiedHoldout {
    #[instrument(skip_all, fields(test_size = self.test_size, n_samples = labels.len()))]
    fn split(&self, labels: &[usize]) -> Result<Vec<Fold>, CvError> {
        if labels.is_empty() {
            return Err(CvError::EmptyDataset);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut train = Vec::new();
        let mut test = Vec::new();

        for (class, mut indices) in indices_by_class(labels) {
            indices.shuffle(&mut rng);
            let n_class = indices.len();
            let mut n_test = (self.test_size * n_class as f64).floor() as usize;
            if n_class >= 2 && n_test == n_class {
                n_test = n_class - 1;
            }
            debug!(class, n_class, n_test, "class allocated");
            test.extend_from_slice(&indices[..n_test]);
            train.extend_from_slice(&indices[n_test..]);
        }

        train.sort_unstable();
        test.sort_unstable();
        Ok(vec![Fold::new(train, test)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_test_size() {
        for bad in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(StratifiedHoldout::new(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn ten_rows_thirty_percent() {
        let labels = vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        let folds = StratifiedHoldout::new(0.3).unwrap().split(&labels).unwrap();
        assert_eq!(folds.len(), 1);
        let fold = &folds[0];
        // floor(0.3 * 5) = 1 per class
        assert_eq!(fold.test().len(), 2);
        assert_eq!(fold.train().len(), 8);

        let train_classes: std::collections::BTreeSet<usize> =
            fold.train().iter().map(|&i| labels[i]).collect();
        assert_eq!(train_classes.len(), 2);
    }

    #[test]
    fn class_keeps_one_training_row() {
        // floor(0.9 * 2) = 1, floor(0.9 * 1) = 0 for the singleton class.
        let labels = vec![0, 0, 1];
        let fold = &StratifiedHoldout::new(0.9).unwrap().split(&labels).unwrap()[0];
        assert_eq!(fold.test().len(), 1);
        assert!(fold.train().contains(&2));
    }

    #[test]
    fn deterministic_for_seed() {
        let labels: Vec<usize> = (0..30).map(|i| i % 3).collect();
        let a = StratifiedHoldout::new(0.25).unwrap().with_seed(9).split(&labels).unwrap();
        let b = StratifiedHoldout::new(0.25).unwrap().with_seed(9).split(&labels).unwrap();
        assert_eq!(a, b);
    }
}
