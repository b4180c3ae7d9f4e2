//! Cross-validated evaluation of a classifier factory.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::classifier::Classifier;
use crate::confusion::ConfusionMatrix;
use crate::error::CvError;
use crate::fold::take;
use crate::metrics::Scorer;
use crate::splitter::Splitter;

/// Scores for one evaluated fold.
#[derive(Debug, Clone, Serialize)]
pub struct FoldScore {
    /// Zero-based fold index as produced by the splitter.
    pub fold: usize,
    /// Number of training rows.
    pub n_train: usize,
    /// Number of held-out rows.
    pub n_test: usize,
    /// Score per scorer name.
    pub scores: BTreeMap<String, f64>,
}

/// Mean and sample standard deviation of one score across folds.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreSummary {
    /// Mean over scored folds.
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0.0 with a single fold.
    pub std: f64,
}

/// Results of evaluating a classifier with a [`Splitter`].
#[derive(Debug, Clone, Serialize)]
pub struct CrossValidationResult {
    /// Per-fold scores, in fold order. Folds with an empty test set are omitted.
    pub folds: Vec<FoldScore>,
    /// Per-scorer summary across the scored folds.
    pub summary: BTreeMap<String, ScoreSummary>,
    /// Confusion matrix over all held-out predictions, if any were made.
    pub confusion_matrix: Option<ConfusionMatrix>,
    /// Total number of samples in the dataset.
    pub n_samples: usize,
    /// Held-out true labels concatenated in fold order.
    #[serde(skip)]
    pub pooled_true: Vec<usize>,
    /// Held-out predictions aligned with `pooled_true`.
    #[serde(skip)]
    pub pooled_predicted: Vec<usize>,
}

impl CrossValidationResult {
    /// Return the summary for the scorer named `name`.
    #[must_use]
    pub fn summary_for(&self, name: &str) -> Option<ScoreSummary> {
        self.summary.get(name).copied()
    }
}

fn summarize(values: &[f64]) -> ScoreSummary {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    ScoreSummary { mean, std }
}

/// Evaluate a freshly built classifier on every fold produced by `splitter`.
///
/// `factory` is called once per fold so no fitted state leaks between folds.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`CvError::EmptyDataset`] | Zero samples |
/// | [`CvError::LengthMismatch`] | `labels.len() != features.len()` |
/// | [`CvError::Estimator`] | The classifier failed to fit or predict a fold |
/// | Other splitter errors | From [`Splitter::split`] |
#[instrument(skip_all, fields(n_samples = features.len(), n_scorers = scorers.len()))]
pub fn cross_validate<C, F>(
    mut factory: F,
    features: &[Vec<f64>],
    labels: &[usize],
    splitter: &dyn Splitter,
    scorers: &[&dyn Scorer],
) -> Result<CrossValidationResult, CvError>
where
    C: Classifier,
    F: FnMut() -> C,
{
    if features.is_empty() {
        return Err(CvError::EmptyDataset);
    }
    if labels.len() != features.len() {
        return Err(CvError::LengthMismatch {
            what: "labels",
            expected: features.len(),
            got: labels.len(),
        });
    }

    let folds = splitter.split(labels)?;

    let mut fold_scores = Vec::with_capacity(folds.len());
    let mut pooled_true = Vec::with_capacity(labels.len());
    let mut pooled_predicted = Vec::with_capacity(labels.len());

    for (fold, split) in folds.iter().enumerate() {
        if split.test().is_empty() {
            warn!(fold, "fold has an empty test set, skipping");
            continue;
        }

        let train_features = take(features, split.train());
        let train_labels = take(labels, split.train());
        let test_features = take(features, split.test());
        let test_labels = take(labels, split.test());

        let mut model = factory();
        model
            .fit(&train_features, &train_labels)
            .map_err(|e| CvError::Estimator {
                fold,
                source: Box::new(e),
            })?;
        let predictions = model
            .predict_batch(&test_features)
            .map_err(|e| CvError::Estimator {
                fold,
                source: Box::new(e),
            })?;

        let mut scores = BTreeMap::new();
        for scorer in scorers {
            scores.insert(
                scorer.name().to_string(),
                scorer.score(&test_labels, &predictions)?,
            );
        }
        info!(fold, n_test = test_labels.len(), ?scores, "fold completed");

        fold_scores.push(FoldScore {
            fold,
            n_train: train_labels.len(),
            n_test: test_labels.len(),
            scores,
        });
        pooled_true.extend_from_slice(&test_labels);
        pooled_predicted.extend_from_slice(&predictions);
    }

    let mut summary = BTreeMap::new();
    if !fold_scores.is_empty() {
        for scorer in scorers {
            let values: Vec<f64> = fold_scores
                .iter()
                .filter_map(|f| f.scores.get(scorer.name()).copied())
                .collect();
            summary.insert(scorer.name().to_string(), summarize(&values));
        }
    }

    let confusion_matrix = if pooled_true.is_empty() {
        None
    } else {
        Some(ConfusionMatrix::from_labels(&pooled_true, &pooled_predicted)?)
    };

    info!(n_folds = fold_scores.len(), "cross-validation complete");

    Ok(CrossValidationResult {
        folds: fold_scores,
        summary,
        confusion_matrix,
        n_samples: features.len(),
        pooled_true,
        pooled_predicted,
    })
}
