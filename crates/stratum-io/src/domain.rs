//! Domain types for loaded datasets and output naming.

use std::collections::BTreeMap;

use crate::IoError;

/// `true` when `name` is non-empty and only uses `[a-zA-Z0-9_-]`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A validated experiment name used as the prefix of every output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if !is_valid_name(&name) {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A feature matrix with one integer class label per row.
///
/// Produced by [`DatasetReader`](crate::DatasetReader). `features[i]` is
/// labelled `labels[i]`.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    /// Feature column names from the CSV header, label column excluded.
    feature_names: Vec<String>,
    /// Feature values: `features[sample_index][feature_index]`.
    features: Vec<Vec<f64>>,
    labels: Vec<usize>,
}

impl LabeledDataset {
    pub(crate) fn new(feature_names: Vec<String>, features: Vec<Vec<f64>>, labels: Vec<usize>) -> Self {
        Self {
            feature_names,
            features,
            labels,
        }
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Row count per class, keyed by ascending label.
    #[must_use]
    pub fn class_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for &label in &self.labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Keep only rows whose label is in `classes`, relabelled to the
    /// position of that label in `classes`.
    ///
    /// Row order is preserved. `select_classes(&[2, 0])` maps class 2 to 0
    /// and class 0 to 1.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`IoError::DuplicateClass`] | a class is listed twice |
    /// | [`IoError::UnknownClass`] | a listed class has no rows |
    pub fn select_classes(&self, classes: &[usize]) -> Result<Self, IoError> {
        let mut position = BTreeMap::new();
        for (idx, &class) in classes.iter().enumerate() {
            if position.insert(class, idx).is_some() {
                return Err(IoError::DuplicateClass { class });
            }
        }
        let counts = self.class_counts();
        if let Some(&class) = classes.iter().find(|c| !counts.contains_key(*c)) {
            return Err(IoError::UnknownClass { class });
        }

        let (features, labels) = self
            .features
            .iter()
            .zip(&self.labels)
            .filter_map(|(row, label)| position.get(label).map(|&new| (row.clone(), new)))
            .unzip();

        Ok(Self {
            feature_names: self.feature_names.clone(),
            features,
            labels,
        })
    }
}
