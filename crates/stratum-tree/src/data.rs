//! Input validation and layout helpers shared by split search and fitting.

use crate::error::TreeError;

/// Check that `features` is a non-empty, rectangular, finite matrix with one
/// label per row. Returns the number of feature columns.
pub(crate) fn validate_features(features: &[Vec<f64>], labels: &[usize]) -> Result<usize, TreeError> {
    if features.is_empty() {
        return Err(TreeError::EmptyDataset);
    }
    if labels.len() != features.len() {
        return Err(TreeError::LabelCountMismatch {
            n_samples: features.len(),
            n_labels: labels.len(),
        });
    }

    let n_features = features[0].len();
    if n_features == 0 {
        return Err(TreeError::ZeroFeatures);
    }

    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(TreeError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(TreeError::NonFiniteValue {
                sample_index,
                feature_index,
            });
        }
    }

    Ok(n_features)
}

/// Transpose row-major samples into `col[feature_idx][sample_idx]`.
pub(crate) fn column_major(features: &[Vec<f64>], n_features: usize) -> Vec<Vec<f64>> {
    (0..n_features)
        .map(|feat_idx| features.iter().map(|row| row[feat_idx]).collect())
        .collect()
}

/// Maps arbitrary label values onto dense class positions `0..n_classes`.
///
/// Positions follow ascending label order, so position 0 is always the
/// smallest label.
#[derive(Debug, Clone)]
pub(crate) struct ClassEncoding {
    classes: Vec<usize>,
    encoded: Vec<usize>,
}

impl ClassEncoding {
    pub(crate) fn new(labels: &[usize]) -> Self {
        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let encoded = labels
            .iter()
            .map(|label| classes.partition_point(|c| c < label))
            .collect();
        Self { classes, encoded }
    }

    /// Distinct labels, ascending.
    pub(crate) fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Class position of each sample.
    pub(crate) fn encoded(&self) -> &[usize] {
        &self.encoded
    }

    pub(crate) fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub(crate) fn into_classes(self) -> Vec<usize> {
        self.classes
    }
}
