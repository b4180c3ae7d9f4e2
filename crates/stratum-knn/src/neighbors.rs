use std::cmp::Ordering;

use crate::distance::Distance;

/// Indices of the `k` rows of `train` closest to `query`.
///
/// Neighbors are ordered by ascending distance, with equal distances broken
/// by ascending row index. When `k >= train.len()` every row is returned.
#[must_use]
pub fn k_nearest<D: Distance + ?Sized>(
    train: &[Vec<f64>],
    query: &[f64],
    k: usize,
    metric: &D,
) -> Vec<usize> {
    let mut ranked: Vec<(f64, usize)> = train
        .iter()
        .enumerate()
        .map(|(idx, row)| (metric.distance(row, query), idx))
        .collect();

    let by_distance_then_index =
        |a: &(f64, usize), b: &(f64, usize)| -> Ordering { a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)) };

    if k == 0 {
        return Vec::new();
    }
    if k < ranked.len() {
        ranked.select_nth_unstable_by(k - 1, by_distance_then_index);
        ranked.truncate(k);
    }
    ranked.sort_unstable_by(by_distance_then_index);
    ranked.into_iter().map(|(_, idx)| idx).collect()
}
