use stratum_cv::Classifier;
use tracing::{debug, instrument};

use crate::distance::{Distance, Metric};
use crate::error::KnnError;
use crate::neighbors::k_nearest;

/// Stored training data of a fitted [`KnnClassifier`].
#[derive(Debug, Clone)]
struct TrainingSet {
    features: Vec<Vec<f64>>,
    /// Class position of each training row.
    encoded: Vec<usize>,
    /// Distinct labels, ascending.
    classes: Vec<usize>,
}

/// k-nearest-neighbors classifier with a pluggable [`Distance`].
///
/// Fitting stores the training rows. Prediction takes a majority vote over
/// the `k` nearest rows; tied votes go to the label that appears first in
/// neighbor order (nearest first).
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `k`       | 3       |
/// | `metric`  | [`Metric::L2`] |
#[derive(Debug, Clone)]
pub struct KnnClassifier<D = Metric> {
    k: usize,
    metric: D,
    training: Option<TrainingSet>,
}

impl KnnClassifier<Metric> {
    /// Create an unfitted classifier using `metric`.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::InvalidK`] when `k` is 0.
    pub fn new(k: usize, metric: Metric) -> Result<Self, KnnError> {
        Self::with_distance(k, metric)
    }
}

impl Default for KnnClassifier<Metric> {
    fn default() -> Self {
        Self {
            k: 3,
            metric: Metric::L2,
            training: None,
        }
    }
}

impl<D: Distance> KnnClassifier<D> {
    /// Create an unfitted classifier with any [`Distance`] implementation.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::InvalidK`] when `k` is 0.
    pub fn with_distance(k: usize, metric: D) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidK { k });
        }
        Ok(Self {
            k,
            metric,
            training: None,
        })
    }

    /// Number of neighbors consulted per prediction.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Distance used to rank training rows.
    #[must_use]
    pub fn metric(&self) -> &D {
        &self.metric
    }

    /// Distinct training labels in ascending order, once fitted.
    #[must_use]
    pub fn classes(&self) -> Option<&[usize]> {
        self.training.as_ref().map(|t| t.classes.as_slice())
    }

    /// Store the training rows.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`KnnError::EmptyDataset`] | `features` is empty |
    /// | [`KnnError::LabelCountMismatch`] | `labels.len() != features.len()` |
    /// | [`KnnError::ZeroFeatures`] | rows have zero feature columns |
    /// | [`KnnError::FeatureCountMismatch`] | rows have inconsistent lengths |
    /// | [`KnnError::NonFiniteValue`] | any value is NaN or infinite |
    #[instrument(skip_all, fields(n_samples = features.len(), k = self.k))]
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), KnnError> {
        if features.is_empty() {
            return Err(KnnError::EmptyDataset);
        }
        if labels.len() != features.len() {
            return Err(KnnError::LabelCountMismatch {
                n_samples: features.len(),
                n_labels: labels.len(),
            });
        }
        let n_features = features[0].len();
        if n_features == 0 {
            return Err(KnnError::ZeroFeatures);
        }
        for (sample_index, row) in features.iter().enumerate() {
            if row.len() != n_features {
                return Err(KnnError::FeatureCountMismatch {
                    expected: n_features,
                    got: row.len(),
                    sample_index,
                });
            }
            if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
                return Err(KnnError::NonFiniteValue {
                    sample_index,
                    feature_index,
                });
            }
        }

        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let encoded = labels
            .iter()
            .map(|label| classes.partition_point(|c| c < label))
            .collect();

        debug!(n_classes = classes.len(), n_features, "stored training set");

        self.training = Some(TrainingSet {
            features: features.to_vec(),
            encoded,
            classes,
        });
        Ok(())
    }

    /// Predict the label of one query row.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`KnnError::NotFitted`] | called before a successful fit |
    /// | [`KnnError::PredictionFeatureMismatch`] | wrong feature count |
    pub fn predict(&self, sample: &[f64]) -> Result<usize, KnnError> {
        let training = self.fitted()?;
        let neighbors = self.neighbors(training, sample)?;
        let counts = vote_counts(training, &neighbors);

        let max = counts.iter().copied().max().unwrap_or(0);
        let winner = neighbors
            .iter()
            .map(|&idx| training.encoded[idx])
            .find(|&class| counts[class] == max)
            .unwrap_or(0);
        Ok(training.classes[winner])
    }

    /// Predict labels for a batch of query rows.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](KnnClassifier::predict).
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<usize>, KnnError> {
        samples.iter().map(|s| self.predict(s)).collect()
    }

    /// Vote share of each class among the neighbors of one query row, in
    /// [`classes`](KnnClassifier::classes) order.
    ///
    /// Shares are divided by the number of neighbors actually consulted,
    /// which is less than `k` when the training set is smaller than `k`.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](KnnClassifier::predict).
    pub fn predict_proba(&self, sample: &[f64]) -> Result<Vec<f64>, KnnError> {
        let training = self.fitted()?;
        let neighbors = self.neighbors(training, sample)?;
        let total = neighbors.len() as f64;
        Ok(vote_counts(training, &neighbors)
            .into_iter()
            .map(|c| c as f64 / total)
            .collect())
    }

    /// Vote shares for a batch of query rows.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](KnnClassifier::predict).
    pub fn predict_proba_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, KnnError> {
        samples.iter().map(|s| self.predict_proba(s)).collect()
    }

    fn fitted(&self) -> Result<&TrainingSet, KnnError> {
        self.training.as_ref().ok_or(KnnError::NotFitted)
    }

    fn neighbors(&self, training: &TrainingSet, sample: &[f64]) -> Result<Vec<usize>, KnnError> {
        let expected = training.features[0].len();
        if sample.len() != expected {
            return Err(KnnError::PredictionFeatureMismatch {
                expected,
                got: sample.len(),
            });
        }
        Ok(k_nearest(&training.features, sample, self.k, &self.metric))
    }
}

fn vote_counts(training: &TrainingSet, neighbors: &[usize]) -> Vec<usize> {
    let mut counts = vec![0usize; training.classes.len()];
    for &idx in neighbors {
        counts[training.encoded[idx]] += 1;
    }
    counts
}

impl<D: Distance> Classifier for KnnClassifier<D> {
    type Error = KnnError;

    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), KnnError> {
        KnnClassifier::fit(self, features, labels)
    }

    fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<usize>, KnnError> {
        KnnClassifier::predict_batch(self, samples)
    }
}
