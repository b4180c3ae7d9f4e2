use tracing::instrument;

use crate::impurity::{gini_from_counts, weighted_from_counts};
use crate::error::TreeError;
use crate::node::{FeatureIndex, Impurity};
use crate::data::{ClassEncoding, column_major, validate_features};

/// The best (feature, threshold) partition found for a set of rows.
#[derive(Debug, Clone)]
pub struct Split {
    feature: FeatureIndex,
    threshold: f64,
    impurity: Impurity,
    left_indices: Vec<usize>,
    right_indices: Vec<usize>,
}

impl Split {
    /// Feature used for the split.
    #[must_use]
    pub fn feature(&self) -> FeatureIndex {
        self.feature
    }

    /// Threshold value: rows with feature <= threshold go left.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Weighted Gini impurity of the two children.
    #[must_use]
    pub fn impurity(&self) -> Impurity {
        self.impurity
    }

    /// Row indices routed to the left child, ascending.
    #[must_use]
    pub fn left_indices(&self) -> &[usize] {
        &self.left_indices
    }

    /// Row indices routed to the right child, ascending.
    #[must_use]
    pub fn right_indices(&self) -> &[usize] {
        &self.right_indices
    }

    pub(crate) fn into_partitions(self) -> (Vec<usize>, Vec<usize>) {
        (self.left_indices, self.right_indices)
    }
}

/// Find the split of a labeled dataset that minimizes weighted Gini impurity.
///
/// `features[sample_idx][feature_idx]`, row-major layout. Any number of
/// distinct labels is accepted. Returns `Ok(None)` when there are fewer than
/// two samples or no feature has two distinct values.
///
/// # Errors
///
/// | Variant | When |
/// |---|---|
/// | [`TreeError::EmptyDataset`] | `features` is empty |
/// | [`TreeError::LabelCountMismatch`] | `labels.len() != features.len()` |
/// | [`TreeError::ZeroFeatures`] | rows have zero feature columns |
/// | [`TreeError::FeatureCountMismatch`] | rows have inconsistent lengths |
/// | [`TreeError::NonFiniteValue`] | any value is NaN or infinite |
pub fn best_split(features: &[Vec<f64>], labels: &[usize]) -> Result<Option<Split>, TreeError> {
    let n_features = validate_features(features, labels)?;
    let encoding = ClassEncoding::new(labels);
    let col_features = column_major(features, n_features);
    let sample_indices: Vec<usize> = (0..features.len()).collect();
    Ok(find_best_split(
        &col_features,
        encoding.encoded(),
        &sample_indices,
        encoding.n_classes(),
    ))
}

/// Scan every feature for the threshold minimizing weighted Gini impurity.
///
/// Candidate thresholds are the midpoints between consecutive distinct
/// sorted values of each feature. Rows with `value <= threshold` go left.
/// Features are scanned in index order and thresholds in ascending order;
/// only a strictly lower impurity replaces the current best, so the first
/// candidate wins exact ties.
///
/// # Column-major layout
///
/// `col_features[feature_idx][sample_idx]`. `classes[sample_idx]` is the
/// class position in `0..n_classes`. `sample_indices` selects the rows at
/// this node and the returned partitions are drawn from it, in its order.
#[instrument(level = "trace", skip_all, fields(n_samples = sample_indices.len()))]
pub(crate) fn find_best_split(
    col_features: &[Vec<f64>],
    classes: &[usize],
    sample_indices: &[usize],
    n_classes: usize,
) -> Option<Split> {
    let n_samples = sample_indices.len();
    if n_samples < 2 {
        return None;
    }

    let mut parent_counts = vec![0usize; n_classes];
    for &si in sample_indices {
        parent_counts[classes[si]] += 1;
    }

    let mut best_impurity = f64::INFINITY;
    let mut best: Option<(usize, f64, Impurity)> = None;

    for (feat_idx, feat_col) in col_features.iter().enumerate() {
        let mut sorted: Vec<(f64, usize)> = sample_indices
            .iter()
            .map(|&si| (feat_col[si], classes[si]))
            .collect();
        sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        // Left grows from empty as the threshold sweeps upward.
        let mut left_counts = vec![0usize; n_classes];
        let mut right_counts = parent_counts.clone();
        let mut n_left = 0usize;

        for pair in sorted.windows(2) {
            let (lo, hi) = (pair[0].0, pair[1].0);
            if lo == hi {
                continue;
            }
            let threshold = (lo + hi) / 2.0;

            while n_left < n_samples && sorted[n_left].0 <= threshold {
                let class = sorted[n_left].1;
                left_counts[class] += 1;
                right_counts[class] -= 1;
                n_left += 1;
            }
            let n_right = n_samples - n_left;
            if n_left == 0 || n_right == 0 {
                continue;
            }

            let impurity = weighted_from_counts(&left_counts, n_left, &right_counts, n_right);
            if impurity.value() < best_impurity {
                best_impurity = impurity.value();
                best = Some((feat_idx, threshold, impurity));
            }
        }
    }

    let (feat_idx, threshold, impurity) = best?;

    let feat_col = &col_features[feat_idx];
    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = sample_indices
        .iter()
        .partition(|&&si| feat_col[si] <= threshold);

    Some(Split {
        feature: FeatureIndex::new(feat_idx),
        threshold,
        impurity,
        left_indices,
        right_indices,
    })
}

/// Per-class counts and Gini impurity of the rows in `sample_indices`.
pub(crate) fn node_counts(
    classes: &[usize],
    sample_indices: &[usize],
    n_classes: usize,
) -> (Vec<usize>, Impurity) {
    let mut counts = vec![0usize; n_classes];
    for &si in sample_indices {
        counts[classes[si]] += 1;
    }
    let impurity = gini_from_counts(&counts, sample_indices.len());
    (counts, impurity)
}
