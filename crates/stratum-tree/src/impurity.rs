//! Gini impurity over label sets and class counts.

use crate::node::Impurity;

/// Compute Gini impurity `1 - Σ(p_k²)` from per-class counts.
///
/// Returns [`Impurity::ZERO`] when `n_samples` is zero. Zero counts contribute
/// nothing, so callers may pass counts for classes absent from the node.
#[must_use]
pub fn gini_from_counts(class_counts: &[usize], n_samples: usize) -> Impurity {
    if n_samples == 0 {
        return Impurity::ZERO;
    }
    let n = n_samples as f64;
    let sum_sq: f64 = class_counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum();
    Impurity::new(1.0 - sum_sq)
}

/// Size-weighted mean of the two children's impurities.
///
/// Returns [`Impurity::ZERO`] when both children are empty.
#[must_use]
pub fn weighted_from_counts(
    left_counts: &[usize],
    n_left: usize,
    right_counts: &[usize],
    n_right: usize,
) -> Impurity {
    let n = n_left + n_right;
    if n == 0 {
        return Impurity::ZERO;
    }
    let total = n as f64;
    let left = gini_from_counts(left_counts, n_left).value();
    let right = gini_from_counts(right_counts, n_right).value();
    Impurity::new((n_left as f64 / total) * left + (n_right as f64 / total) * right)
}

/// Count occurrences of each distinct label, in ascending label order.
fn label_counts(labels: &[usize]) -> Vec<usize> {
    let mut sorted = labels.to_vec();
    sorted.sort_unstable();
    let mut counts = Vec::new();
    let mut prev = None;
    for label in sorted {
        if prev == Some(label) {
            if let Some(last) = counts.last_mut() {
                *last += 1;
            }
        } else {
            counts.push(1);
            prev = Some(label);
        }
    }
    counts
}

/// Gini impurity of a label sequence. Empty input is pure.
#[must_use]
pub fn gini(labels: &[usize]) -> Impurity {
    gini_from_counts(&label_counts(labels), labels.len())
}

/// Weighted Gini impurity after splitting into `left` and `right`.
#[must_use]
pub fn weighted_gini(left: &[usize], right: &[usize]) -> Impurity {
    weighted_from_counts(
        &label_counts(left),
        left.len(),
        &label_counts(right),
        right.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_labels_have_zero_gini() {
        assert_eq!(gini(&[1, 1, 1, 1]).value(), 0.0);
        assert_eq!(gini(&[7]).value(), 0.0);
    }

    #[test]
    fn empty_labels_have_zero_gini() {
        assert_eq!(gini(&[]).value(), 0.0);
        assert_eq!(weighted_gini(&[], &[]).value(), 0.0);
    }

    #[test]
    fn balanced_binary_is_exactly_half() {
        assert_eq!(gini(&[0, 0, 1, 1]).value(), 0.5);
        assert_eq!(gini(&[0, 1, 0, 1, 0, 1, 0, 1, 0, 1]).value(), 0.5);
    }

    #[test]
    fn mixed_labels_are_impure() {
        let g = gini(&[0, 0, 0, 1]).value();
        assert!((g - 0.375).abs() < 1e-12);
        assert!(g > 0.0);
    }

    #[test]
    fn three_class_uniform() {
        let g = gini(&[4, 5, 6]).value();
        assert!((g - (1.0 - 3.0 * (1.0 / 3.0_f64).powi(2))).abs() < 1e-12);
    }

    #[test]
    fn weighted_by_child_size() {
        // left pure (weight 0.5), right [0, 1] gini 0.5 (weight 0.5)
        let w = weighted_gini(&[0, 0], &[0, 1]).value();
        assert!((w - 0.25).abs() < 1e-12);
        // one side empty: just the other side's impurity
        assert!((weighted_gini(&[], &[0, 1]).value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn counts_and_labels_agree() {
        // Zero counts for absent classes do not change the value.
        let from_labels = gini(&[2, 2, 9]).value();
        let from_counts = gini_from_counts(&[2, 0, 1], 3).value();
        assert_eq!(from_labels, from_counts);
    }
}
