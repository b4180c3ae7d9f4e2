//! Error types for Gaussian Naive Bayes.

/// Errors from Gaussian Naive Bayes fitting and prediction.
#[derive(Debug, thiserror::Error)]
pub enum BayesError {
    /// Returned when `var_smoothing` is negative or not finite.
    #[error("var_smoothing must be finite and non-negative, got {var_smoothing}")]
    InvalidVarSmoothing {
        /// The invalid smoothing value provided.
        var_smoothing: f64,
    },

    /// Returned when fewer than two training samples are provided.
    #[error("need at least 2 samples to fit, got {n_samples}")]
    TooFewSamples {
        /// The number of samples provided.
        n_samples: usize,
    },

    /// Returned when the training dataset has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a sample has a different number of features than expected.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the sample.
        got: usize,
        /// The zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when the label vector and feature matrix disagree on the sample count.
    #[error("got {n_labels} labels for {n_samples} samples")]
    LabelCountMismatch {
        /// Number of feature rows.
        n_samples: usize,
        /// Number of labels.
        n_labels: usize,
    },

    /// Returned when a training value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The zero-based index of the offending feature column.
        feature_index: usize,
    },

    /// Returned when a query has a different number of features than the training data.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the query.
        got: usize,
    },

    /// Returned when predicting with a model that has not been fitted.
    #[error("Gaussian Naive Bayes model is not fitted; call fit first")]
    NotFitted,
}
