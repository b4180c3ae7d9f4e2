/// Why a tree could not be fitted or queried.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// `max_depth` of zero leaves no room for a root.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// Value passed to the config.
        max_depth: usize,
    },

    /// A node with fewer than two rows can never split.
    #[error("min_samples_split must be at least 2, got {min_samples_split}")]
    InvalidMinSamplesSplit {
        /// Value passed to the config.
        min_samples_split: usize,
    },

    /// No training rows.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// A single row cannot carry two classes.
    #[error("need at least 2 samples to fit, got {n_samples}")]
    TooFewSamples {
        /// Rows supplied.
        n_samples: usize,
    },

    /// Rows exist but carry no columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// A training row is shorter or longer than the first row.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        got: usize,
        /// Row position.
        sample_index: usize,
    },

    /// One label per row is required.
    #[error("got {n_labels} labels for {n_samples} samples")]
    LabelCountMismatch {
        /// Feature rows.
        n_samples: usize,
        /// Labels supplied.
        n_labels: usize,
    },

    /// NaN or infinity in the training matrix.
    #[error("non-finite value at sample {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// Row position.
        sample_index: usize,
        /// Column position.
        feature_index: usize,
    },

    /// The labels hold one class or more than two.
    #[error("binary decision tree needs exactly 2 classes, got {classes:?}")]
    NotBinary {
        /// Distinct labels, ascending.
        classes: Vec<usize>,
    },

    /// A query row does not match the training width.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// Training width.
        expected: usize,
        /// Query width.
        got: usize,
    },

    /// `predict` before a successful `fit`.
    #[error("decision tree is not fitted; call fit first")]
    NotFitted,
}
