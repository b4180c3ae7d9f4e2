/// Errors from splitting, scoring, and cross-validated evaluation.
#[derive(Debug, thiserror::Error)]
pub enum CvError {
    /// Returned when fewer than two splits are requested.
    #[error("n_splits must be at least 2, got {n_splits}")]
    InvalidSplitCount {
        /// The invalid n_splits value provided.
        n_splits: usize,
    },

    /// Returned when more splits are requested than there are samples.
    #[error("n_splits ({n_splits}) cannot exceed the number of samples ({n_samples})")]
    TooManySplits {
        /// The requested number of splits.
        n_splits: usize,
        /// The number of samples available.
        n_samples: usize,
    },

    /// Returned when a splitter needs more samples than were provided.
    #[error("need at least {required} samples, got {n_samples}")]
    TooFewSamples {
        /// The minimum number of samples required.
        required: usize,
        /// The number of samples provided.
        n_samples: usize,
    },

    /// Returned when the holdout test fraction is not in (0.0, 1.0).
    #[error("test_size must be in (0.0, 1.0), got {test_size}")]
    InvalidTestSize {
        /// The invalid test_size value provided.
        test_size: f64,
    },

    /// Returned when the feature matrix has zero rows.
    #[error("dataset has zero samples")]
    EmptyDataset,

    /// Returned when two parallel sequences have different lengths.
    #[error("length mismatch: {what} has {got} entries, expected {expected}")]
    LengthMismatch {
        /// Which input was the wrong length.
        what: &'static str,
        /// The expected length.
        expected: usize,
        /// The actual length.
        got: usize,
    },

    /// Returned when the scaler is used before being fitted on data.
    #[error("scaler is not fitted; call fit first")]
    ScalerNotFitted,

    /// Returned when an estimator fails while fitting or predicting a fold.
    #[error("estimator failed on fold {fold}")]
    Estimator {
        /// The zero-based fold index.
        fold: usize,
        /// The underlying estimator error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
