//! k-nearest-neighbors classification with pluggable distance metrics.
//!
//! Provides the [`Distance`] trait with Euclidean, Manhattan, Chebyshev,
//! cosine and Hamming implementations, a runtime-selectable [`Metric`],
//! deterministic neighbor search, and a [`KnnClassifier`] that plugs into
//! `stratum-cv` evaluation.

mod classifier;
mod distance;
mod error;
mod neighbors;

pub use classifier::KnnClassifier;
pub use distance::{Chebyshev, Cosine, Distance, Euclidean, Hamming, Manhattan, Metric};
pub use error::KnnError;
pub use neighbors::k_nearest;
