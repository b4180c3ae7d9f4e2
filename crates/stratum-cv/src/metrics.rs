//! Scoring functions for evaluated folds.

use crate::confusion::ConfusionMatrix;
use crate::error::CvError;

/// Fraction of positions where `predicted` equals `true_labels`.
///
/// Returns 0.0 for empty input.
///
/// # Errors
///
/// Returns [`CvError::LengthMismatch`] when the slices differ in length.
pub fn accuracy(true_labels: &[usize], predicted: &[usize]) -> Result<f64, CvError> {
    if predicted.len() != true_labels.len() {
        return Err(CvError::LengthMismatch {
            what: "predicted labels",
            expected: true_labels.len(),
            got: predicted.len(),
        });
    }
    if true_labels.is_empty() {
        return Ok(0.0);
    }
    let correct = true_labels
        .iter()
        .zip(predicted)
        .filter(|&(t, p)| t == p)
        .count();
    Ok(correct as f64 / true_labels.len() as f64)
}

/// A named score computed from true and predicted labels of one fold.
pub trait Scorer {
    /// Key under which the score is reported.
    fn name(&self) -> &'static str;

    /// Score `predicted` against `true_labels`. Higher is better.
    ///
    /// # Errors
    ///
    /// Returns a [`CvError`] when the inputs are empty or mismatched.
    fn score(&self, true_labels: &[usize], predicted: &[usize]) -> Result<f64, CvError>;
}

/// Plain accuracy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl Scorer for Accuracy {
    fn name(&self) -> &'static str {
        "accuracy"
    }

    fn score(&self, true_labels: &[usize], predicted: &[usize]) -> Result<f64, CvError> {
        accuracy(true_labels, predicted)
    }
}

/// Macro-averaged recall.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedAccuracy;

impl Scorer for BalancedAccuracy {
    fn name(&self) -> &'static str {
        "balanced_accuracy"
    }

    fn score(&self, true_labels: &[usize], predicted: &[usize]) -> Result<f64, CvError> {
        Ok(ConfusionMatrix::from_labels(true_labels, predicted)?.balanced_accuracy())
    }
}

/// Macro-averaged one-vs-rest sensitivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroSensitivity;

impl Scorer for MacroSensitivity {
    fn name(&self) -> &'static str {
        "macro_sensitivity"
    }

    fn score(&self, true_labels: &[usize], predicted: &[usize]) -> Result<f64, CvError> {
        Ok(ConfusionMatrix::from_labels(true_labels, predicted)?.macro_sensitivity())
    }
}

/// Macro-averaged one-vs-rest specificity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroSpecificity;

impl Scorer for MacroSpecificity {
    fn name(&self) -> &'static str {
        "macro_specificity"
    }

    fn score(&self, true_labels: &[usize], predicted: &[usize]) -> Result<f64, CvError> {
        Ok(ConfusionMatrix::from_labels(true_labels, predicted)?.macro_specificity())
    }
}
