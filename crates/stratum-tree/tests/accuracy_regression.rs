//! Accuracy regression tests for stratum-tree.
//!
//! These tests check that changes to split search or tree building do not
//! degrade accuracy on a deterministic synthetic binary dataset.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use stratum_cv::{Accuracy, BalancedAccuracy, StratifiedKFold, cross_validate};
use stratum_tree::{DecisionTreeClassifier, DecisionTreeConfig, Node};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic binary dataset
// ---------------------------------------------------------------------------

/// Generate a 200-sample, 6-feature, 2-class dataset.
///
/// Features 0-1 are informative (class * 2.0 + noise in [0, 0.5]).
/// Features 2-5 are pure noise in [0, 2.5].
/// Samples alternate between the two classes.
fn make_binary() -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let n_samples = 200;
    let n_features = 6;

    let mut features = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % 2;
        labels.push(class);
        let row: Vec<f64> = (0..n_features)
            .map(|f| {
                if f < 2 {
                    class as f64 * 2.0 + rng.r#gen::<f64>() * 0.5
                } else {
                    rng.r#gen::<f64>() * 2.5
                }
            })
            .collect();
        features.push(row);
    }
    (features, labels)
}

// ---------------------------------------------------------------------------
// a) cv_accuracy_above_threshold
// ---------------------------------------------------------------------------

/// 5-fold stratified cross-validation mean accuracy must exceed 0.95.
#[test]
fn cv_accuracy_above_threshold() {
    let (features, labels) = make_binary();
    let splitter = StratifiedKFold::new(5).unwrap().with_seed(42);
    let result = cross_validate(
        || DecisionTreeClassifier::new(DecisionTreeConfig::new().with_max_depth(3)),
        &features,
        &labels,
        &splitter,
        &[&Accuracy, &BalancedAccuracy],
    )
    .unwrap();

    let accuracy = result.summary_for("accuracy").unwrap().mean;
    assert!(accuracy > 0.95, "cv mean accuracy {accuracy} <= 0.95");
    assert_eq!(result.folds.len(), 5);
}

// ---------------------------------------------------------------------------
// b) root_splits_on_informative_feature
// ---------------------------------------------------------------------------

/// The root must split on one of the two informative features.
#[test]
fn root_splits_on_informative_feature() {
    let (features, labels) = make_binary();
    let tree = DecisionTreeConfig::new().fit(&features, &labels).unwrap();

    match tree.root() {
        Node::Split { feature, .. } => assert!(feature.index() < 2, "root split on f{feature}"),
        Node::Leaf { .. } => panic!("root should be a split"),
    }
    assert_eq!(tree.predict_batch(&features).unwrap(), labels);
}

// ---------------------------------------------------------------------------
// c) deterministic_fit
// ---------------------------------------------------------------------------

/// Fitting twice on the same data must give identical trees.
#[test]
fn deterministic_fit() {
    let (features, labels) = make_binary();
    let config = DecisionTreeConfig::new().with_max_depth(4);
    let a = config.fit(&features, &labels).unwrap();
    let b = config.fit(&features, &labels).unwrap();

    assert_eq!(a.n_nodes(), b.n_nodes());
    assert_eq!(
        a.predict_batch(&features).unwrap(),
        b.predict_batch(&features).unwrap()
    );
}

// ---------------------------------------------------------------------------
// d) depth_never_exceeds_limit
// ---------------------------------------------------------------------------

#[test]
fn depth_never_exceeds_limit() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    // Labels ignore the features, so the tree keeps splitting until the limit.
    let features: Vec<Vec<f64>> = (0..150)
        .map(|_| (0..4).map(|_| rng.r#gen::<f64>()).collect())
        .collect();
    let labels: Vec<usize> = (0..150).map(|i| if i < 75 { 3 } else { 8 }).collect();

    for max_depth in 1..=5 {
        let tree = DecisionTreeConfig::new()
            .with_max_depth(max_depth)
            .fit(&features, &labels)
            .unwrap();
        assert!(tree.depth() <= max_depth, "depth {} > {max_depth}", tree.depth());
        let predictions = tree.predict_batch(&features).unwrap();
        assert!(predictions.iter().all(|p| *p == 3 || *p == 8));
    }
}
