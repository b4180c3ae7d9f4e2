//! Fold coverage and evaluator behaviour across every splitter.

use std::convert::Infallible;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use stratum_cv::{
    Accuracy, BalancedAccuracy, Classifier, CvError, Fold, KFold, LeaveOneOut, Scorer,
    Splitter, StratifiedHoldout, StratifiedKFold, cross_validate,
};

/// Predicts 1 when the first feature exceeds the midpoint of the two class means.
#[derive(Default)]
struct MidpointRule {
    cut: Option<f64>,
}

impl Classifier for MidpointRule {
    type Error = Infallible;

    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), Infallible> {
        let mean = |class: usize| {
            let values: Vec<f64> = features
                .iter()
                .zip(labels)
                .filter(|&(_, &y)| y == class)
                .map(|(row, _)| row[0])
                .collect();
            values.iter().sum::<f64>() / values.len().max(1) as f64
        };
        self.cut = Some((mean(0) + mean(1)) / 2.0);
        Ok(())
    }

    fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, Infallible> {
        let cut = self.cut.unwrap_or(0.0);
        Ok(features.iter().map(|row| usize::from(row[0] > cut)).collect())
    }
}

fn alternating(n: usize) -> Vec<usize> {
    (0..n).map(|i| i % 2).collect()
}

fn assert_partition(folds: &[Fold], n_samples: usize) {
    let mut seen = vec![0usize; n_samples];
    for fold in folds {
        assert!(fold.train().is_sorted());
        assert!(fold.test().is_sorted());
        assert_eq!(fold.train().len() + fold.test().len(), n_samples);
        for &i in fold.test() {
            seen[i] += 1;
            assert!(fold.train().binary_search(&i).is_err());
        }
    }
    assert!(seen.iter().all(|&count| count == 1), "coverage {seen:?}");
}

// ---------------------------------------------------------------------------
// Splitters
// ---------------------------------------------------------------------------

#[test]
fn stratified_twelve_alternating_labels_three_folds() {
    let labels = alternating(12);
    let folds = StratifiedKFold::new(3).unwrap().with_seed(7).split(&labels).unwrap();

    assert_eq!(folds.len(), 3);
    for fold in &folds {
        assert_eq!(fold.test().len(), 4);
        let ones = fold.test().iter().filter(|&&i| labels[i] == 1).count();
        assert_eq!(ones, 2);
    }
    let mut union: Vec<usize> = folds.iter().flat_map(|f| f.test().to_vec()).collect();
    union.sort_unstable();
    assert_eq!(union, (0..12).collect::<Vec<_>>());
}

#[test]
fn every_kfold_style_splitter_covers_each_row_once() {
    let labels: Vec<usize> = (0..23).map(|i| i % 3).collect();
    let stratified = StratifiedKFold::new(4).unwrap().with_seed(1);
    let shuffled = KFold::new(5).unwrap().with_seed(1);
    let ordered = KFold::new(5).unwrap().with_shuffle(false);
    let splitters: [(&str, &dyn Splitter); 4] = [
        ("stratified", &stratified),
        ("kfold", &shuffled),
        ("kfold_ordered", &ordered),
        ("loo", &LeaveOneOut),
    ];
    for (name, splitter) in splitters {
        let folds = splitter.split(&labels).unwrap();
        assert!(!folds.is_empty(), "{name}");
        assert_partition(&folds, labels.len());
    }
}

#[test]
fn same_seed_same_folds() {
    let labels: Vec<usize> = (0..40).map(|i| usize::from(i % 5 == 0)).collect();
    let a = StratifiedKFold::new(4).unwrap().with_seed(99).split(&labels).unwrap();
    let b = StratifiedKFold::new(4).unwrap().with_seed(99).split(&labels).unwrap();
    assert_eq!(a, b);

    let h1 = StratifiedHoldout::new(0.3).unwrap().with_seed(5).split(&labels).unwrap();
    let h2 = StratifiedHoldout::new(0.3).unwrap().with_seed(5).split(&labels).unwrap();
    assert_eq!(h1, h2);
}

#[test]
fn holdout_takes_a_share_of_each_class() {
    let labels: Vec<usize> = [vec![0; 8], vec![1; 4]].concat();
    let folds = StratifiedHoldout::new(0.25).unwrap().split(&labels).unwrap();

    assert_eq!(folds.len(), 1);
    let test = folds[0].test();
    assert_eq!(test.iter().filter(|&&i| labels[i] == 0).count(), 2);
    assert_eq!(test.iter().filter(|&&i| labels[i] == 1).count(), 1);
    assert_eq!(folds[0].train().len(), 9);
}

#[test]
fn parameter_errors() {
    assert!(matches!(StratifiedKFold::new(1), Err(CvError::InvalidSplitCount { .. })));
    assert!(matches!(KFold::new(0), Err(CvError::InvalidSplitCount { .. })));
    assert!(matches!(StratifiedHoldout::new(1.0), Err(CvError::InvalidTestSize { .. })));
    assert!(StratifiedKFold::new(5).unwrap().split(&alternating(4)).is_err());
    assert!(LeaveOneOut.split(&[0]).is_err());
}

#[test]
fn n_splits_equal_to_n_samples_is_accepted() {
    let labels = vec![0, 1, 0, 1, 1, 0, 1];
    let n = labels.len();
    let stratified = StratifiedKFold::new(n).unwrap().with_seed(11);
    let shuffled = KFold::new(n).unwrap().with_seed(11);
    let ordered = KFold::new(n).unwrap().with_shuffle(false);
    let splitters: [(&str, &dyn Splitter); 3] = [
        ("stratified", &stratified),
        ("kfold", &shuffled),
        ("kfold_ordered", &ordered),
    ];
    for (name, splitter) in splitters {
        let folds = splitter.split(&labels).unwrap();
        assert_eq!(folds.len(), n, "{name}");
        assert_partition(&folds, n);
    }
    for splitter in [&shuffled, &ordered] {
        let folds = splitter.split(&labels).unwrap();
        assert!(folds.iter().all(|f| f.test().len() == 1));
    }
    // Each class starts filling at fold 0: three 0s and four 1s leave the last three empty.
    let sizes: Vec<usize> = stratified
        .split(&labels)
        .unwrap()
        .iter()
        .map(|f| f.test().len())
        .collect();
    assert_eq!(sizes, vec![2, 2, 2, 1, 0, 0, 0]);
}

#[test]
fn coverage_holds_for_every_valid_split_count() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for n in 2..30 {
        let labels: Vec<usize> = (0..n).map(|_| rng.gen_range(0..3)).collect();
        for k in 2..=n {
            let stratified = StratifiedKFold::new(k).unwrap().with_seed(k as u64);
            let folds = stratified.split(&labels).unwrap();
            assert_eq!(folds.len(), k, "stratified n={n} k={k}");
            assert_partition(&folds, n);

            let folds = KFold::new(k).unwrap().with_seed(n as u64).split(&labels).unwrap();
            assert_eq!(folds.len(), k, "kfold n={n} k={k}");
            assert_partition(&folds, n);
        }
        assert!(StratifiedKFold::new(n + 1).unwrap().split(&labels).is_err());
        assert!(KFold::new(n + 1).unwrap().split(&labels).is_err());
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

#[test]
fn separable_data_scores_perfectly_on_every_fold() {
    let labels = alternating(30);
    let features: Vec<Vec<f64>> = labels
        .iter()
        .enumerate()
        .map(|(i, &y)| vec![y as f64 * 10.0 + (i % 7) as f64 * 0.1])
        .collect();
    let splitter = StratifiedKFold::new(5).unwrap().with_seed(3);
    let scorers: [&dyn Scorer; 2] = [&Accuracy, &BalancedAccuracy];

    let result =
        cross_validate(MidpointRule::default, &features, &labels, &splitter, &scorers).unwrap();

    assert_eq!(result.folds.len(), 5);
    assert_eq!(result.n_samples, 30);
    let summary = result.summary_for(Accuracy.name()).unwrap();
    assert_eq!(summary.mean, 1.0);
    assert_eq!(summary.std, 0.0);
    let matrix = result.confusion_matrix.as_ref().unwrap();
    assert_eq!(matrix.labels(), &[0, 1]);
    assert_eq!(matrix.as_rows(), &[vec![15, 0], vec![0, 15]]);
    for fold in &result.folds {
        assert_eq!(fold.n_train + fold.n_test, 30);
        assert_eq!(fold.scores[BalancedAccuracy.name()], 1.0);
    }
}

#[test]
fn mismatched_labels_are_rejected_before_any_fit() {
    let features = vec![vec![0.0]; 6];
    let splitter = KFold::new(2).unwrap();
    let scorers: [&dyn Scorer; 1] = [&Accuracy];
    let err = cross_validate(MidpointRule::default, &features, &[0, 1], &splitter, &scorers);
    assert!(err.is_err());
}
