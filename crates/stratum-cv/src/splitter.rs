use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::CvError;
use crate::fold::Fold;

/// A strategy for partitioning a labeled dataset into train/test folds.
///
/// Implementors only see the label vector; the number of samples is its length.
pub trait Splitter {
    /// Produce the folds for `labels`.
    ///
    /// # Errors
    ///
    /// Implementations return a [`CvError`] when their parameters are
    /// incompatible with the number of samples.
    fn split(&self, labels: &[usize]) -> Result<Vec<Fold>, CvError>;
}

/// Divide `len` items into `n_chunks` contiguous ranges whose sizes differ by at most one.
///
/// The first `len % n_chunks` ranges get the extra element. Chunks may be empty when
/// `len < n_chunks`.
pub(crate) fn balanced_chunks(len: usize, n_chunks: usize) -> Vec<Range<usize>> {
    let base = len / n_chunks;
    let extra = len % n_chunks;
    let mut start = 0;
    (0..n_chunks)
        .map(|i| {
            let size = base + usize::from(i < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Group row indices by label, classes in ascending label order, indices ascending.
pub(crate) fn indices_by_class(labels: &[usize]) -> BTreeMap<usize, Vec<usize>> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        groups.entry(label).or_default().push(i);
    }
    groups
}
