//! Error types for gradient descent.

/// Errors from objective construction and descent configuration.
#[derive(Debug, thiserror::Error)]
pub enum GdError {
    /// Returned when the learning rate is not a positive finite number.
    #[error("learning_rate must be positive and finite, got {learning_rate}")]
    InvalidLearningRate {
        /// The invalid learning rate provided.
        learning_rate: f64,
    },

    /// Returned when the gradient-norm tolerance is negative or not finite.
    #[error("tol must be non-negative and finite, got {tol}")]
    InvalidTolerance {
        /// The invalid tolerance provided.
        tol: f64,
    },

    /// Returned when a point has a different dimension than the objective.
    #[error("point has {got} coordinates, objective expects {expected}")]
    DimensionMismatch {
        /// Dimension of the objective.
        expected: usize,
        /// Dimension of the supplied point.
        got: usize,
    },

    /// Returned when a starting point or centre coordinate is NaN or infinite.
    #[error("non-finite coordinate at index {index}")]
    NonFiniteCoordinate {
        /// Index of the offending coordinate.
        index: usize,
    },

    /// Returned when a quadratic weight is not a positive finite number.
    #[error("weight {index} must be positive and finite, got {weight}")]
    InvalidWeight {
        /// Index of the offending weight.
        index: usize,
        /// The invalid weight.
        weight: f64,
    },

    /// Returned when a quadratic has no axes.
    #[error("objective must have at least one dimension")]
    EmptyObjective,
}
