//! Criterion benchmarks for stratum-tree: split search, fitting, prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use stratum_tree::{DecisionTreeConfig, best_split};

fn make_binary(n_samples: usize, n_features: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % 2;
        labels.push(class);
        let row: Vec<f64> = (0..n_features)
            .map(|f| {
                let base = if f < 2 { class as f64 } else { 0.0 };
                base + rng.r#gen::<f64>() * 1.5
            })
            .collect();
        features.push(row);
    }
    (features, labels)
}

fn bench_best_split(c: &mut Criterion) {
    let (features, labels) = make_binary(1000, 10, 42);

    c.bench_function("best_split_1000x10", |b| {
        b.iter(|| best_split(&features, &labels).unwrap());
    });
}

fn bench_tree_fit(c: &mut Criterion) {
    let (features, labels) = make_binary(1000, 10, 42);
    let config = DecisionTreeConfig::new().with_max_depth(6);

    c.bench_function("tree_fit_1000x10_depth6", |b| {
        b.iter(|| config.fit(&features, &labels).unwrap());
    });
}

fn bench_tree_predict_batch(c: &mut Criterion) {
    let (features, labels) = make_binary(1000, 10, 42);
    let tree = DecisionTreeConfig::new()
        .with_max_depth(6)
        .fit(&features, &labels)
        .unwrap();

    c.bench_function("tree_predict_batch_1000x10", |b| {
        b.iter(|| tree.predict_batch(&features).unwrap());
    });
}

criterion_group!(benches, bench_best_split, bench_tree_fit, bench_tree_predict_batch);
criterion_main!(benches);
