use crate::error::GdError;

/// A differentiable function of a fixed number of real variables.
pub trait Objective {
    /// Number of coordinates the function takes.
    fn dim(&self) -> usize;

    /// Function value at `point`.
    fn value(&self, point: &[f64]) -> f64;

    /// Gradient at `point`, one entry per coordinate.
    fn gradient(&self, point: &[f64]) -> Vec<f64>;
}

/// Axis-aligned convex quadratic `f(p) = Σ w_i (p_i - c_i)²`.
///
/// The default is the two-variable bowl `(x - 3)² + 2(y + 1)²`, whose
/// minimum is `f(3, -1) = 0`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ShiftedQuadratic {
    weights: Vec<f64>,
    centres: Vec<f64>,
}

impl ShiftedQuadratic {
    /// Create a quadratic from per-axis weights and centres.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`GdError::EmptyObjective`] | `weights` is empty |
    /// | [`GdError::DimensionMismatch`] | `centres.len() != weights.len()` |
    /// | [`GdError::InvalidWeight`] | a weight is not positive and finite |
    /// | [`GdError::NonFiniteCoordinate`] | a centre is not finite |
    pub fn new(weights: Vec<f64>, centres: Vec<f64>) -> Result<Self, GdError> {
        if weights.is_empty() {
            return Err(GdError::EmptyObjective);
        }
        if centres.len() != weights.len() {
            return Err(GdError::DimensionMismatch {
                expected: weights.len(),
                got: centres.len(),
            });
        }
        if let Some((index, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w > 0.0))
        {
            return Err(GdError::InvalidWeight { index, weight });
        }
        if let Some(index) = centres.iter().position(|c| !c.is_finite()) {
            return Err(GdError::NonFiniteCoordinate { index });
        }
        Ok(Self { weights, centres })
    }

    /// The point where the function reaches its minimum of 0.
    #[must_use]
    pub fn minimizer(&self) -> &[f64] {
        &self.centres
    }

    /// Per-axis curvature weights.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Default for ShiftedQuadratic {
    fn default() -> Self {
        Self {
            weights: vec![1.0, 2.0],
            centres: vec![3.0, -1.0],
        }
    }
}

impl Objective for ShiftedQuadratic {
    fn dim(&self) -> usize {
        self.weights.len()
    }

    fn value(&self, point: &[f64]) -> f64 {
        point
            .iter()
            .zip(self.weights.iter().zip(&self.centres))
            .map(|(p, (w, c))| w * (p - c) * (p - c))
            .sum()
    }

    fn gradient(&self, point: &[f64]) -> Vec<f64> {
        point
            .iter()
            .zip(self.weights.iter().zip(&self.centres))
            .map(|(p, (w, c))| 2.0 * w * (p - c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bowl_matches_closed_form() {
        let f = ShiftedQuadratic::default();
        assert_eq!(f.dim(), 2);
        assert_eq!(f.value(&[0.0, 0.0]), 11.0);
        assert_eq!(f.value(&[3.0, -1.0]), 0.0);
        assert_eq!(f.gradient(&[0.0, 0.0]), vec![-6.0, 4.0]);
        assert_eq!(f.gradient(&[5.0, 1.0]), vec![4.0, 8.0]);
        assert_eq!(f.minimizer(), &[3.0, -1.0]);
    }

    #[test]
    fn rejects_bad_shapes_and_weights() {
        assert!(matches!(ShiftedQuadratic::new(vec![], vec![]), Err(GdError::EmptyObjective)));
        assert!(matches!(
            ShiftedQuadratic::new(vec![1.0, 1.0], vec![0.0]),
            Err(GdError::DimensionMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            ShiftedQuadratic::new(vec![1.0, -2.0], vec![0.0, 0.0]),
            Err(GdError::InvalidWeight { index: 1, .. })
        ));
        assert!(matches!(
            ShiftedQuadratic::new(vec![1.0], vec![f64::NAN]),
            Err(GdError::NonFiniteCoordinate { index: 0 })
        ));
    }

    #[test]
    fn three_dimensional_gradient() {
        let f = ShiftedQuadratic::new(vec![0.5, 1.0, 3.0], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(f.gradient(&[2.0, 2.0, 2.0]), vec![1.0, 0.0, -6.0]);
        assert_eq!(f.value(&[2.0, 2.0, 2.0]), 0.5 + 0.0 + 3.0);
    }
}
