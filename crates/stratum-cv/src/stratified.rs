//! Stratified k-fold splitting.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::error::CvError;
use crate::fold::Fold;
use crate::splitter::{Splitter, balanced_chunks, indices_by_class};

/// Stratified k-fold cross-validation splitter.
///
/// Construct via [`StratifiedKFold::new`], then chain `with_seed` if desired.
///
/// Each class's row indices are shuffled with a generator seeded from `seed`
/// and cut into `n_splits` near-equal chunks. Fold `i` tests on chunk `i` of
/// every class, so each test fold keeps roughly the global class proportions.
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    n_splits: usize,
    seed: u64,
}

impl StratifiedKFold {
    /// Create a splitter producing `n_splits` folds.
    ///
    /// # Errors
    ///
    /// Returns [`CvError::InvalidSplitCount`] if `n_splits` < 2.
    pub fn new(n_splits: usize) -> Result<Self, CvError> {
        if n_splits < 2 {
            return Err(CvError::InvalidSplitCount { n_splits });
        }
        Ok(Self { n_splits, seed: 42 })
    }

    /// Set the random seed for per-class shuffling.
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

    /// Return the shuffling seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Splitter for StratifiedKFold {
    /// # Errors
    ///
    /// Returns [`CvError::TooManySplits`] if `n_splits` exceeds `labels.len()`.
    #[instrument(skip_all, fields(n_splits = self.n_splits, n_samples = labels.len()))]
    fn split(&self, labels: &[usize]) -> Result<Vec<Fold>, CvError> {
        let n_samples = labels.len();
        if self.n_splits > n_samples {
            return Err(CvError::TooManySplits {
                n_splits: self.n_splits,
                n_samples,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut tests: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];

        for (class, mut indices) in indices_by_class(labels) {
            indices.shuffle(&mut rng);
            for (fold, range) in balanced_chunks(indices.len(), self.n_splits)
                .into_iter()
                .enumerate()
            {
                tests[fold].extend_from_slice(&indices[range]);
            }
            debug!(class, count = indices.len(), "class distributed across folds");
        }

        Ok(tests
            .into_iter()
            .map(|mut test| {
                test.sort_unstable();
                Fold::from_test(test, n_samples)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternating(n: usize) -> Vec<usize> {
        (0..n).map(|i| i % 2).collect()
    }

    #[test]
    fn invalid_split_count() {
        assert!(matches!(
            StratifiedKFold::new(1),
            Err(CvError::InvalidSplitCount { n_splits: 1 })
        ));
        assert!(StratifiedKFold::new(0).is_err());
    }

    #[test]
    fn too_many_splits() {
        let err = StratifiedKFold::new(5).unwrap().split(&[0, 1, 0]).unwrap_err();
        assert!(matches!(
            err,
            CvError::TooManySplits {
                n_splits: 5,
                n_samples: 3
            }
        ));
    }

    #[test]
    fn balanced_twelve_into_three() {
        let labels = alternating(12);
        let folds = StratifiedKFold::new(3).unwrap().split(&labels).unwrap();
        assert_eq!(folds.len(), 3);

        let mut all: Vec<usize> = Vec::new();
        for fold in &folds {
            assert_eq!(fold.test().len(), 4);
            assert_eq!(fold.train().len(), 8);
            all.extend_from_slice(fold.test());
        }
        all.sort_unstable();
        assert_eq!(all, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn every_test_fold_keeps_class_balance() {
        let labels = alternating(12);
        let folds = StratifiedKFold::new(3).unwrap().split(&labels).unwrap();
        for fold in &folds {
            let ones = fold.test().iter().filter(|&&i| labels[i] == 1).count();
            assert_eq!(ones, 2);
        }
    }

    #[test]
    fn train_and_test_are_disjoint() {
        let labels = vec![0, 0, 0, 1, 1, 1, 1, 2, 2, 2];
        let folds = StratifiedKFold::new(3).unwrap().split(&labels).unwrap();
        for fold in &folds {
            assert!(fold.test().iter().all(|i| !fold.train().contains(i)));
            assert_eq!(fold.test().len() + fold.train().len(), labels.len());
        }
    }

    #[test]
    fn same_seed_same_folds() {
        let labels = vec![0, 1, 1, 0, 2, 2, 1, 0, 0, 1, 2, 0, 1];
        let a = StratifiedKFold::new(4).unwrap().with_seed(7).split(&labels).unwrap();
        let b = StratifiedKFold::new(4).unwrap().with_seed(7).split(&labels).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn small_class_leaves_some_folds_without_it() {
        // Class 1 has a single sample: exactly one fold tests on it.
        let labels = vec![0, 0, 0, 0, 1, 0];
        let folds = StratifiedKFold::new(3).unwrap().split(&labels).unwrap();
        let holding_class_1 = folds.iter().filter(|f| f.test().contains(&4)).count();
        assert_eq!(holding_class_1, 1);
    }
}
