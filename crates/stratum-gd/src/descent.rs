use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::GdError;
use crate::objective::Objective;

/// Configuration for plain gradient descent.
///
/// Construct via [`DescentConfig::new`], then chain `with_*` methods.
/// Values are validated when [`minimize`](DescentConfig::minimize) runs.
///
/// # Defaults
///
/// | Parameter       | Default |
/// |-----------------|---------|
/// | `learning_rate` | 0.1     |
/// | `epochs`        | 200     |
/// | `tol`           | 1e-6    |
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DescentConfig {
    learning_rate: f64,
    epochs: usize,
    tol: f64,
}

impl DescentConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 200,
            tol: 1e-6,
        }
    }

    /// Set the step size.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the maximum number of iterations.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the gradient-norm threshold below which descent stops.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Step size applied to the gradient.
    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Upper bound on recorded steps.
    #[must_use]
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Gradient norm below which the run counts as converged.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Run gradient descent on `objective` from `start`.
    ///
    /// Each epoch records the current point, value and gradient norm, stops
    /// if the norm is below `tol`, and otherwise steps `p ← p - lr·∇f(p)`.
    /// With zero epochs the start point is returned with an empty history.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`GdError::InvalidLearningRate`] | `learning_rate` is not positive and finite |
    /// | [`GdError::InvalidTolerance`] | `tol` is negative or not finite |
    /// | [`GdError::DimensionMismatch`] | `start.len() != objective.dim()` |
    /// | [`GdError::NonFiniteCoordinate`] | a start coordinate is NaN or infinite |
    #[instrument(skip_all, fields(learning_rate = self.learning_rate, epochs = self.epochs))]
    pub fn minimize<O: Objective + ?Sized>(
        &self,
        objective: &O,
        start: &[f64],
    ) -> Result<DescentResult, GdError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(GdError::InvalidLearningRate {
                learning_rate: self.learning_rate,
            });
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(GdError::InvalidTolerance { tol: self.tol });
        }
        if start.len() != objective.dim() {
            return Err(GdError::DimensionMismatch {
                expected: objective.dim(),
                got: start.len(),
            });
        }
        if let Some(index) = start.iter().position(|c| !c.is_finite()) {
            return Err(GdError::NonFiniteCoordinate { index });
        }

        let mut point = start.to_vec();
        let mut history = Vec::with_capacity(self.epochs.min(1024));
        let mut converged = false;

        for epoch in 0..self.epochs {
            let gradient = objective.gradient(&point);
            let grad_norm = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();
            history.push(DescentStep {
                epoch,
                point: point.clone(),
                value: objective.value(&point),
                grad_norm,
            });

            if grad_norm < self.tol {
                converged = true;
                break;
            }
            for (p, g) in point.iter_mut().zip(&gradient) {
                *p -= self.learning_rate * g;
            }
        }

        let value = objective.value(&point);
        if converged {
            info!(epochs_used = history.len(), value, "gradient descent converged");
        } else {
            debug!(epochs_used = history.len(), value, "epoch budget exhausted");
        }

        Ok(DescentResult {
            point,
            value,
            converged,
            history,
        })
    }
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One recorded iteration, taken before the step is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescentStep {
    /// Zero-based iteration number.
    pub epoch: usize,
    /// Point at the start of the iteration.
    pub point: Vec<f64>,
    /// Objective value at `point`.
    pub value: f64,
    /// Euclidean norm of the gradient at `point`.
    pub grad_norm: f64,
}

/// Outcome of [`DescentConfig::minimize`].
#[derive(Debug, Clone, Serialize)]
pub struct DescentResult {
    /// Final point.
    pub point: Vec<f64>,
    /// Objective value at the final point.
    pub value: f64,
    /// Whether the gradient norm fell below the tolerance.
    pub converged: bool,
    /// Every recorded iteration, in order.
    pub history: Vec<DescentStep>,
}

impl DescentResult {
    /// Number of recorded iterations.
    #[must_use]
    pub fn epochs_used(&self) -> usize {
        self.history.len()
    }
}
