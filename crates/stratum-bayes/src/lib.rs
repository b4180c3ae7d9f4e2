//! Gaussian Naive Bayes classification.
//!
//! Per-class normal likelihoods with variance smoothing, log-space
//! prediction, softmax posteriors, and a [`stratum_cv::Classifier`]
//! implementation for cross-validation.

mod error;
mod gaussian;

pub use error::BayesError;
pub use gaussian::GaussianNb;
