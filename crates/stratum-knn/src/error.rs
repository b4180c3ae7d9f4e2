//! Error types for k-nearest-neighbors classification.

/// Errors from KNN configuration, fitting, and prediction.
#[derive(Debug, thiserror::Error)]
pub enum KnnError {
    /// Returned when `k` is zero.
    #[error("k must be at least 1, got {k}")]
    InvalidK {
        /// The invalid k value provided.
        k: usize,
    },

    /// Returned when a metric name does not match any known distance.
    #[error("unknown distance metric '{name}', expected one of l2, l1, chebyshev, cosine, hamming")]
    UnknownMetric {
        /// The unrecognized name.
        name: String,
    },

    /// Returned when the training dataset has zero samples.
    #[error("training dataset has zero samples")]
    EmptyDataset,

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
    #[error("query has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the query.
        got: usize,
    },

    /// Returned when predicting with a classifier that has not been fitted.
    #[error("KNN classifier is not fitted; call fit first")]
    NotFitted,
}
