//! Distance functions between feature vectors.
//!
//! Every function assumes both slices have the same length; callers are
//! responsible for checking dimensions.

use std::fmt;
use std::str::FromStr;

use crate::error::KnnError;

/// A dissimilarity between two feature vectors. Smaller is closer.
pub trait Distance {
    /// Distance between `a` and `b`, which must have equal length.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Euclidean (L2) distance: `sqrt(Σ (a_i - b_i)²)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Distance for Euclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}

/// Manhattan (L1) distance: `Σ |a_i - b_i|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl Distance for Manhattan {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
    }
}

/// Chebyshev (L∞) distance: `max |a_i - b_i|`, 0 for empty vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chebyshev;

impl Distance for Chebyshev {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }
}

/// Cosine distance: `1 - a·b / (‖a‖ ‖b‖)`.
///
/// Two zero vectors are at distance 0; a zero vector and a non-zero vector
/// are at distance 1. The similarity is clamped to `[-1, 1]`, so the result
/// lies in `[0, 2]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl Distance for Cosine {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
        let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
        match (norm_a == 0.0, norm_b == 0.0) {
            (true, true) => 0.0,
            (true, false) | (false, true) => 1.0,
            (false, false) => {
                let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                1.0 - (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
            }
        }
    }
}

/// Hamming distance: the number of positions where the vectors differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming;

impl Distance for Hamming {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).filter(|(x, y)| x != y).count() as f64
    }
}

/// Runtime-selectable distance, parsed from `l2`, `l1`, `chebyshev`,
/// `cosine` or `hamming`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Metric {
    /// [`Euclidean`].
    #[default]
    L2,
    /// [`Manhattan`].
    L1,
    /// [`Chebyshev`].
    Chebyshev,
    /// [`Cosine`].
    Cosine,
    /// [`Hamming`].
    Hamming,
}

impl Metric {
    /// The name this metric parses from.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::L2 => "l2",
            Metric::L1 => "l1",
            Metric::Chebyshev => "chebyshev",
            Metric::Cosine => "cosine",
            Metric::Hamming => "hamming",
        }
    }
}

impl Distance for Metric {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Metric::L2 => Euclidean.distance(a, b),
            Metric::L1 => Manhattan.distance(a, b),
            Metric::Chebyshev => Chebyshev.distance(a, b),
            Metric::Cosine => Cosine.distance(a, b),
            Metric::Hamming => Hamming.distance(a, b),
        }
    }
}

impl FromStr for Metric {
    type Err = KnnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l2" | "euclidean" => Ok(Metric::L2),
            "l1" | "manhattan" => Ok(Metric::L1),
            "chebyshev" => Ok(Metric::Chebyshev),
            "cosine" => Ok(Metric::Cosine),
            "hamming" => Ok(Metric::Hamming),
            _ => Err(KnnError::UnknownMetric { name: s.to_owned() }),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
