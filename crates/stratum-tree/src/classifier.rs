use stratum_cv::Classifier;
use tracing::instrument;

use crate::error::TreeError;
use crate::tree::{DecisionTree, DecisionTreeConfig};

/// A decision tree that remembers its configuration between fits.
///
/// Predicting before a successful [`fit`](DecisionTreeClassifier::fit)
/// returns [`TreeError::NotFitted`]. A failed fit keeps whatever tree was
/// fitted before.
#[derive(Debug, Clone, Default)]
pub struct DecisionTreeClassifier {
    config: DecisionTreeConfig,
    tree: Option<DecisionTree>,
}

impl DecisionTreeClassifier {
    /// Create an unfitted classifier.
    #[must_use]
    pub fn new(config: DecisionTreeConfig) -> Self {
        Self { config, tree: None }
    }

    /// Fit on `features` and `labels`, replacing any previous tree.
    ///
    /// # Errors
    ///
    /// Any error from [`DecisionTreeConfig::fit`].
    #[instrument(skip_all, fields(n_samples = features.len()))]
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), TreeError> {
        let tree = self.config.fit(features, labels)?;
        self.tree = Some(tree);
        Ok(())
    }

    /// Predict a single sample.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`TreeError::NotFitted`] | called before a successful fit |
    /// | [`TreeError::PredictionFeatureMismatch`] | wrong feature count |
    pub fn predict(&self, sample: &[f64]) -> Result<usize, TreeError> {
        self.fitted()?.predict(sample)
    }

    /// Predict a batch of samples.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](DecisionTreeClassifier::predict).
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<usize>, TreeError> {
        self.fitted()?.predict_batch(samples)
    }

    /// Settings used by every `fit`.
    #[must_use]
    pub fn config(&self) -> &DecisionTreeConfig {
        &self.config
    }

    /// The fitted tree, if any.
    #[must_use]
    pub fn tree(&self) -> Option<&DecisionTree> {
        self.tree.as_ref()
    }

    fn fitted(&self) -> Result<&DecisionTree, TreeError> {
        self.tree.as_ref().ok_or(TreeError::NotFitted)
    }
}

impl Classifier for DecisionTreeClassifier {
    type Error = TreeError;

    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), TreeError> {
        DecisionTreeClassifier::fit(self, features, labels)
    }

    fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<usize>, TreeError> {
        DecisionTreeClassifier::predict_batch(self, samples)
    }
}
