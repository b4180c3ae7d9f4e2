use std::f64::consts::PI;

use stratum_cv::Classifier;
use tracing::{debug, instrument};

use crate::error::BayesError;

/// Per-class parameters learned by [`GaussianNb::fit`].
#[derive(Debug, Clone)]
struct Parameters {
    classes: Vec<usize>,
    class_log_prior: Vec<f64>,
    /// `means[class][feature]`.
    means: Vec<Vec<f64>>,
    /// `variances[class][feature]`, smoothing already added.
    variances: Vec<Vec<f64>>,
}

/// Gaussian Naive Bayes classifier.
///
/// Each feature is modelled as an independent normal distribution per class.
/// Prediction picks the class with the largest joint log-likelihood
/// `log π_c + Σ_j log N(x_j | μ_cj, σ²_cj)`; ties go to the smaller label.
///
/// # Defaults
///
/// | Parameter       | Default |
/// |-----------------|---------|
/// | `var_smoothing` | 1e-9    |
#[derive(Debug, Clone)]
pub struct GaussianNb {
    var_smoothing: f64,
    params: Option<Parameters>,
}

impl GaussianNb {
    /// Create an unfitted model with default smoothing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            var_smoothing: 1e-9,
            params: None,
        }
    }

    /// Set the constant added to every variance and used as the prior floor.
    #[must_use]
    pub fn with_var_smoothing(mut self, var_smoothing: f64) -> Self {
        self.var_smoothing = var_smoothing;
        self
    }

    /// Variance and prior floor, default `1e-9`.
    #[must_use]
    pub fn var_smoothing(&self) -> f64 {
        self.var_smoothing
    }

    /// Distinct training labels, ascending, once fitted.
    #[must_use]
    pub fn classes(&self) -> Option<&[usize]> {
        self.params.as_ref().map(|p| p.classes.as_slice())
    }

    /// Log prior of each class, in [`classes`](GaussianNb::classes) order.
    #[must_use]
    pub fn class_log_prior(&self) -> Option<&[f64]> {
        self.params.as_ref().map(|p| p.class_log_prior.as_slice())
    }

    /// Per-class feature means.
    #[must_use]
    pub fn means(&self) -> Option<&[Vec<f64>]> {
        self.params.as_ref().map(|p| p.means.as_slice())
    }

    /// Per-class feature variances, including smoothing.
    #[must_use]
    pub fn variances(&self) -> Option<&[Vec<f64>]> {
        self.params.as_ref().map(|p| p.variances.as_slice())
    }

    /// Estimate class priors, means and variances.
    ///
    /// Variances are population variances (divisor `n_c`) plus
    /// `var_smoothing`. Priors are floored at `var_smoothing` before the log.
    /// A failed fit leaves the previous parameters in place.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`BayesError::InvalidVarSmoothing`] | smoothing is negative, NaN or infinite |
    /// | [`BayesError::TooFewSamples`] | fewer than 2 samples |
    /// | [`BayesError::LabelCountMismatch`] | `labels.len() != features.len()` |
    /// | [`BayesError::ZeroFeatures`] | rows have zero feature columns |
    /// | [`BayesError::FeatureCountMismatch`] | rows have inconsistent lengths |
    /// | [`BayesError::NonFiniteValue`] | any value is NaN or infinite |
    #[instrument(skip_all, fields(n_samples = features.len()))]
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), BayesError> {
        let eps = self.var_smoothing;
        if !(eps.is_finite() && eps >= 0.0) {
            return Err(BayesError::InvalidVarSmoothing { var_smoothing: eps });
        }
        let n_features = validate(features, labels)?;
        let n_samples = features.len();

        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let n_classes = classes.len();

        let mut counts = vec![0usize; n_classes];
        let mut sums = vec![vec![0.0; n_features]; n_classes];
        for (row, label) in features.iter().zip(labels) {
            let c = classes.partition_point(|x| x < label);
            counts[c] += 1;
            for (s, v) in sums[c].iter_mut().zip(row) {
                *s += v;
            }
        }

        let means: Vec<Vec<f64>> = sums
            .iter()
            .zip(&counts)
            .map(|(s, &n)| s.iter().map(|v| v / n as f64).collect())
            .collect();

        let mut variances = vec![vec![0.0; n_features]; n_classes];
        for (row, label) in features.iter().zip(labels) {
            let c = classes.partition_point(|x| x < label);
            for ((acc, v), mu) in variances[c].iter_mut().zip(row).zip(&means[c]) {
                *acc += (v - mu) * (v - mu);
            }
        }
        for (var_row, &n) in variances.iter_mut().zip(&counts) {
            for v in var_row.iter_mut() {
                *v = *v / n as f64 + eps;
            }
        }

        let class_log_prior = counts
            .iter()
            .map(|&n| (n as f64 / n_samples as f64).clamp(eps, 1.0).ln())
            .collect();

        debug!(n_classes, n_features, "estimated class-conditional gaussians");

        self.params = Some(Parameters {
            classes,
            class_log_prior,
            means,
            variances,
        });
        Ok(())
    }

    /// Joint log-likelihood of each class for one sample, in
    /// [`classes`](GaussianNb::classes) order.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`BayesError::NotFitted`] | called before a successful fit |
    /// | [`BayesError::PredictionFeatureMismatch`] | wrong feature count |
    pub fn joint_log_likelihood(&self, sample: &[f64]) -> Result<Vec<f64>, BayesError> {
        let params = self.params.as_ref().ok_or(BayesError::NotFitted)?;
        let expected = params.means[0].len();
        if sample.len() != expected {
            return Err(BayesError::PredictionFeatureMismatch {
                expected,
                got: sample.len(),
            });
        }

        let log_2pi = (2.0 * PI).ln();
        Ok(params
            .class_log_prior
            .iter()
            .zip(params.means.iter().zip(&params.variances))
            .map(|(prior, (means, vars))| {
                let log_likelihood: f64 = sample
                    .iter()
                    .zip(means.iter().zip(vars))
                    .map(|(x, (mu, var))| -0.5 * (log_2pi + var.ln() + (x - mu) * (x - mu) / var))
                    .sum();
                prior + log_likelihood
            })
            .collect())
    }

    /// Predict the label of one sample.
    ///
    /// # Errors
    ///
    /// Same as [`joint_log_likelihood`](GaussianNb::joint_log_likelihood).
    pub fn predict(&self, sample: &[f64]) -> Result<usize, BayesError> {
        let jll = self.joint_log_likelihood(sample)?;
        let mut best = 0;
        for (idx, &value) in jll.iter().enumerate() {
            if value > jll[best] {
                best = idx;
            }
        }
        let params = self.params.as_ref().ok_or(BayesError::NotFitted)?;
        Ok(params.classes[best])
    }

    /// Predict labels for a batch of samples.
    ///
    /// # Errors
    ///
    /// Same as [`joint_log_likelihood`](GaussianNb::joint_log_likelihood).
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<usize>, BayesError> {
        samples.iter().map(|s| self.predict(s)).collect()
    }

    /// Posterior class probabilities for one sample: a softmax over the joint
    /// log-likelihood, shifted by its maximum.
    ///
    /// # Errors
    ///
    /// Same as [`joint_log_likelihood`](GaussianNb::joint_log_likelihood).
    pub fn predict_proba(&self, sample: &[f64]) -> Result<Vec<f64>, BayesError> {
        let jll = self.joint_log_likelihood(sample)?;
        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = jll.iter().map(|v| (v - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        Ok(exp.into_iter().map(|v| v / total).collect())
    }
}

impl Default for GaussianNb {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(features: &[Vec<f64>], labels: &[usize]) -> Result<usize, BayesError> {
    if features.len() < 2 {
        return Err(BayesError::TooFewSamples {
            n_samples: features.len(),
        });
    }
    if labels.len() != features.len() {
        return Err(BayesError::LabelCountMismatch {
            n_samples: features.len(),
            n_labels: labels.len(),
        });
    }
    let n_features = features[0].len();
    if n_features == 0 {
        return Err(BayesError::ZeroFeatures);
    }
    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(BayesError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(BayesError::NonFiniteValue {
                sample_index,
                feature_index,
            });
        }
    }
    Ok(n_features)
}

impl Classifier for GaussianNb {
    type Error = BayesError;

    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), BayesError> {
        GaussianNb::fit(self, features, labels)
    }

    fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<usize>, BayesError> {
        GaussianNb::predict_batch(self, samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> (Vec<Vec<f64>>, Vec<usize>) {
        (
            vec![
                vec![1.0, 2.0],
                vec![3.0, 2.0],
                vec![10.0, 0.0],
                vec![12.0, 4.0],
                vec![11.0, 2.0],
            ],
            vec![0, 0, 5, 5, 5],
        )
    }

    #[test]
    fn estimates_priors_means_and_population_variances() {
        let (features, labels) = toy();
        let mut nb = GaussianNb::new();
        nb.fit(&features, &labels).unwrap();

        assert_eq!(nb.classes(), Some(&[0, 5][..]));
        let prior = nb.class_log_prior().unwrap();
        assert!((prior[0] - (0.4f64).ln()).abs() < 1e-12);
        assert!((prior[1] - (0.6f64).ln()).abs() < 1e-12);

        let means = nb.means().unwrap();
        assert_eq!(means[0], vec![2.0, 2.0]);
        assert_eq!(means[1], vec![11.0, 2.0]);

        let vars = nb.variances().unwrap();
        assert!((vars[0][0] - (1.0 + 1e-9)).abs() < 1e-15);
        assert!((vars[0][1] - 1e-9).abs() < 1e-18);
        assert!((vars[1][0] - (2.0 / 3.0 + 1e-9)).abs() < 1e-12);
        assert!((vars[1][1] - (8.0 / 3.0 + 1e-9)).abs() < 1e-12);
    }

    #[test]
    fn predicts_nearest_class() {
        let (features, labels) = toy();
        let mut nb = GaussianNb::new().with_var_smoothing(1e-2);
        nb.fit(&features, &labels).unwrap();
        assert_eq!(nb.predict(&[2.5, 2.0]).unwrap(), 0);
        assert_eq!(nb.predict(&[10.5, 2.5]).unwrap(), 5);
    }

    #[test]
    fn proba_sums_to_one_and_matches_prediction() {
        let (features, labels) = toy();
        let mut nb = GaussianNb::new().with_var_smoothing(1e-2);
        nb.fit(&features, &labels).unwrap();
        let proba = nb.predict_proba(&[9.0, 2.0]).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(proba[1] > proba[0]);
        assert_eq!(nb.predict(&[9.0, 2.0]).unwrap(), 5);
    }

    #[test]
    fn proba_survives_extreme_log_likelihoods() {
        let (features, labels) = toy();
        let mut nb = GaussianNb::new();
        nb.fit(&features, &labels).unwrap();
        let proba = nb.predict_proba(&[1000.0, 2.0]).unwrap();
        assert!(proba.iter().all(|p| p.is_finite()));
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn not_fitted_before_fit() {
        let nb = GaussianNb::new();
        assert!(matches!(nb.predict(&[1.0]), Err(BayesError::NotFitted)));
        assert!(matches!(nb.predict_proba(&[1.0]), Err(BayesError::NotFitted)));
        assert!(nb.classes().is_none());
    }

    #[test]
    fn validation_errors() {
        let mut nb = GaussianNb::new();
        assert!(matches!(
            nb.fit(&[vec![1.0]], &[0]),
            Err(BayesError::TooFewSamples { n_samples: 1 })
        ));
        assert!(matches!(
            nb.fit(&[vec![1.0], vec![2.0]], &[0]),
            Err(BayesError::LabelCountMismatch { n_samples: 2, n_labels: 1 })
        ));
        assert!(matches!(
            nb.fit(&[vec![1.0], vec![f64::NAN]], &[0, 1]),
            Err(BayesError::NonFiniteValue { sample_index: 1, feature_index: 0 })
        ));

        for var_smoothing in [-1e-9, f64::NAN, f64::INFINITY] {
            let mut bad = GaussianNb::new().with_var_smoothing(var_smoothing);
            assert!(matches!(
                bad.fit(&[vec![1.0], vec![2.0]], &[0, 1]),
                Err(BayesError::InvalidVarSmoothing { .. })
            ));
        }
    }

    #[test]
    fn zero_smoothing_is_accepted() {
        let features = vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]];
        let mut nb = GaussianNb::new().with_var_smoothing(0.0);
        nb.fit(&features, &[0, 0, 1, 1]).unwrap();
        assert_eq!(nb.variances().unwrap()[0], vec![0.25]);
        assert_eq!(nb.predict(&[0.5]).unwrap(), 0);
        assert_eq!(nb.predict(&[10.2]).unwrap(), 1);
    }

    #[test]
    fn failed_fit_keeps_parameters() {
        let (features, labels) = toy();
        let mut nb = GaussianNb::new();
        nb.fit(&features, &labels).unwrap();
        assert!(nb.fit(&[vec![1.0]], &[0]).is_err());
        assert_eq!(nb.classes(), Some(&[0, 5][..]));
    }

    #[test]
    fn prediction_feature_mismatch() {
        let (features, labels) = toy();
        let mut nb = GaussianNb::new();
        nb.fit(&features, &labels).unwrap();
        assert!(matches!(
            nb.predict(&[1.0, 2.0, 3.0]),
            Err(BayesError::PredictionFeatureMismatch { expected: 2, got: 3 })
        ));
    }
}
