//! Confusion matrix and one-vs-rest classification metrics.

use std::fmt;

use serde::Serialize;

use crate::error::CvError;

/// A confusion matrix over an arbitrary set of class labels.
///
/// `labels` is the sorted union of the true and predicted labels. Entry
/// `matrix[i][j]` counts samples whose true label is `labels[i]` and whose
/// predicted label is `labels[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    labels: Vec<usize>,
    matrix: Vec<Vec<usize>>,
}

/// One-vs-rest metrics for a single class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassMetrics {
    /// The class label.
    pub label: usize,
    /// TP / (TP + FP). 0.0 if the class was never predicted.
    pub precision: f64,
    /// Sensitivity, TP / (TP + FN). 0.0 if the class has no true samples.
    pub recall: f64,
    /// TN / (TN + FP). 0.0 if every sample belongs to this class.
    pub specificity: f64,
    /// 2 * precision * recall / (precision + recall). 0.0 if both are zero.
    pub f1: f64,
    /// Number of true samples in this class.
    pub support: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl ConfusionMatrix {
    /// Build a confusion matrix from true and predicted labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CvError::EmptyDataset`] | Zero labels provided |
    /// | [`CvError::LengthMismatch`] | `predicted.len() != true_labels.len()` |
    pub fn from_labels(true_labels: &[usize], predicted: &[usize]) -> Result<Self, CvError> {
        if true_labels.is_empty() {
            return Err(CvError::EmptyDataset);
        }
        if predicted.len() != true_labels.len() {
            return Err(CvError::LengthMismatch {
                what: "predicted labels",
                expected: true_labels.len(),
                got: predicted.len(),
            });
        }

        let mut labels: Vec<usize> = true_labels.iter().chain(predicted).copied().collect();
        labels.sort_unstable();
        labels.dedup();

        let position = |label: usize| labels.binary_search(&label).unwrap_or_default();
        let mut matrix = vec![vec![0usize; labels.len()]; labels.len()];
        for (&t, &p) in true_labels.iter().zip(predicted) {
            matrix[position(t)][position(p)] += 1;
        }
        Ok(Self { labels, matrix })
    }

    /// Overall accuracy: proportion of correct predictions.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.labels.len()).map(|i| self.matrix[i][i]).sum();
        ratio(correct, self.total())
    }

    /// Per-class one-vs-rest metrics, in label order.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        let n = self.labels.len();
        let total = self.total();
        (0..n)
            .map(|c| {
                let tp = self.matrix[c][c];
                let fp: usize = (0..n).filter(|&i| i != c).map(|i| self.matrix[i][c]).sum();
                let fn_: usize = (0..n).filter(|&j| j != c).map(|j| self.matrix[c][j]).sum();
                let tn = total - tp - fp - fn_;
                let precision = ratio(tp, tp + fp);
                let recall = ratio(tp, tp + fn_);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    label: self.labels[c],
                    precision,
                    recall,
                    specificity: ratio(tn, tn + fp),
                    f1,
                    support: tp + fn_,
                }
            })
            .collect()
    }

    /// Macro-averaged sensitivity (recall) across all classes.
    #[must_use]
    pub fn macro_sensitivity(&self) -> f64 {
        self.macro_average(|m| m.recall)
    }

    /// Macro-averaged specificity across all classes.
    #[must_use]
    pub fn macro_specificity(&self) -> f64 {
        self.macro_average(|m| m.specificity)
    }

    /// Balanced accuracy: the macro-averaged recall.
    #[must_use]
    pub fn balanced_accuracy(&self) -> f64 {
        self.macro_sensitivity()
    }

    /// Return the class labels, one per row and column.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    fn total(&self) -> usize {
        self.matrix.iter().flat_map(|row| row.iter()).sum()
    }

    fn macro_average(&self, metric: impl Fn(&ClassMetrics) -> f64) -> f64 {
        let metrics = self.class_metrics();
        if metrics.is_empty() {
            return 0.0;
        }
        metrics.iter().map(metric).sum::<f64>() / metrics.len() as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "")?;
        for label in &self.labels {
            write!(f, " pred_{label:>3}")?;
        }
        writeln!(f)?;

        for (label, row) in self.labels.iter().zip(&self.matrix) {
            write!(f, "true_{label:>3}")?;
            for val in row {
                write!(f, " {val:>7}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let labels = vec![0, 0, 1, 1, 2, 2];
        let cm = ConfusionMatrix::from_labels(&labels, &labels).unwrap();
        assert!((cm.accuracy() - 1.0).abs() < f64::EPSILON);
        for m in cm.class_metrics() {
            assert!((m.precision - 1.0).abs() < f64::EPSILON);
            assert!((m.recall - 1.0).abs() < f64::EPSILON);
            assert!((m.specificity - 1.0).abs() < f64::EPSILON);
            assert!((m.f1 - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn known_confusion_matrix() {
        // Pred: [0,0,1, 1,1,2, 2,2,0]
        let true_labels = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
        let predicted = vec![0, 0, 1, 1, 1, 2, 2, 2, 0];
        let cm = ConfusionMatrix::from_labels(&true_labels, &predicted).unwrap();
        let metrics = cm.class_metrics();

        // Class 0: TP=2, FP=1, FN=1, TN=5
        assert!((metrics[0].precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics[0].recall - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics[0].specificity - 5.0 / 6.0).abs() < 1e-10);
        assert_eq!(metrics[0].support, 3);
        assert!((cm.accuracy() - 6.0 / 9.0).abs() < 1e-10);
        assert!((cm.balanced_accuracy() - 2.0 / 3.0).abs() < 1e-10);
        assert!((cm.macro_specificity() - 5.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn labels_need_not_be_contiguous() {
        let cm = ConfusionMatrix::from_labels(&[3, 7, 7], &[3, 3, 7]).unwrap();
        assert_eq!(cm.labels(), &[3, 7]);
        assert_eq!(cm.as_rows()[0], vec![1, 0]);
        assert_eq!(cm.as_rows()[1], vec![1, 1]);
    }

    #[test]
    fn predicted_only_label_gets_zero_support() {
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 1], &[0, 2, 1, 1]).unwrap();
        let metrics = cm.class_metrics();
        assert_eq!(metrics[2].label, 2);
        assert_eq!(metrics[2].support, 0);
        assert!((metrics[2].recall - 0.0).abs() < f64::EPSILON);
        assert!((metrics[2].precision - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_labels_error() {
        let err = ConfusionMatrix::from_labels(&[], &[]).unwrap_err();
        assert!(matches!(err, CvError::EmptyDataset));
    }

    #[test]
    fn length_mismatch_error() {
        let err = ConfusionMatrix::from_labels(&[0, 1], &[0]).unwrap_err();
        assert!(matches!(err, CvError::LengthMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn display_formatting() {
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 1]).unwrap();
        let output = format!("{cm}");
        assert!(output.contains("pred_"));
        assert!(output.contains("true_"));
    }
}
