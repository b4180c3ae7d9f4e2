use serde::Serialize;

/// One train/test partition of row indices.
///
/// Both index lists are sorted ascending and disjoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fold {
    train: Vec<usize>,
    test: Vec<usize>,
}

impl Fold {
    pub(crate) fn new(train: Vec<usize>, test: Vec<usize>) -> Self {
        debug_assert!(train.is_sorted() && test.is_sorted());
        Self { train, test }
    }

    /// Build a fold from a sorted test set; the train set is its complement in `0..n_samples`.
    pub(crate) fn from_test(test: Vec<usize>, n_samples: usize) -> Self {
        let mut in_test = vec![false; n_samples];
        for &i in &test {
            in_test[i] = true;
        }
        let train = (0..n_samples).filter(|&i| !in_test[i]).collect();
        Self::new(train, test)
    }

    /// Row indices used for training.
    #[must_use]
    pub fn train(&self) -> &[usize] {
        &self.train
    }

    /// Row indices held out for testing.
    #[must_use]
    pub fn test(&self) -> &[usize] {
        &self.test
    }
}

/// Gather the rows of `values` at `indices`, in index order.
#[must_use]
pub fn take<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}
