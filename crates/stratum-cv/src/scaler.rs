//! Per-feature standardization and a classifier wrapper that applies it.

use crate::classifier::Classifier;
use crate::error::CvError;

/// Zero-mean, unit-variance scaling per feature column.
///
/// Uses the population standard deviation; constant columns get a scale of 1.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Learn column means and standard deviations from `features`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CvError::EmptyDataset`] | `features` is empty |
    /// | [`CvError::LengthMismatch`] | rows have inconsistent lengths |
    pub fn fit(features: &[Vec<f64>]) -> Result<Self, CvError> {
        let Some(first) = features.first() else {
            return Err(CvError::EmptyDataset);
        };
        let n_features = first.len();
        let n = features.len() as f64;

        let mut mean = vec![0.0; n_features];
        for row in features {
            if row.len() != n_features {
                return Err(CvError::LengthMismatch {
                    what: "feature row",
                    expected: n_features,
                    got: row.len(),
                });
            }
            for (m, &v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut std = vec![0.0; n_features];
        for row in features {
            for ((s, &v), &m) in std.iter_mut().zip(row).zip(&mean) {
                *s += (v - m).powi(2);
            }
        }
        for s in &mut std {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Ok(Self { mean, std })
    }

    /// Standardize `features` with the learned statistics.
    ///
    /// # Errors
    ///
    /// Returns [`CvError::LengthMismatch`] when a row's length differs from the
    /// number of fitted columns.
    pub fn transform(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, CvError> {
        features
            .iter()
            .map(|row| {
                if row.len() != self.mean.len() {
                    return Err(CvError::LengthMismatch {
                        what: "feature row",
                        expected: self.mean.len(),
                        got: row.len(),
                    });
                }
                Ok(row
                    .iter()
                    .zip(self.mean.iter().zip(&self.std))
                    .map(|(&v, (&m, &s))| (v - m) / s)
                    .collect())
            })
            .collect()
    }

    /// Return the learned column means.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Return the learned column scales.
    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.std
    }
}

/// Errors from a [`Standardized`] classifier.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError<E: std::error::Error + 'static> {
    /// Returned when fitting or applying the scaler fails.
    #[error("feature scaling failed")]
    Scaling(#[source] CvError),

    /// Returned when the wrapped classifier fails.
    #[error(transparent)]
    Estimator(E),
}

/// A classifier that standardizes features before delegating to `C`.
///
/// The scaler is fitted on the training rows only, so held-out rows are
/// scaled with training statistics.
#[derive(Debug, Clone)]
pub struct Standardized<C> {
    inner: C,
    scaler: Option<StandardScaler>,
}

impl<C> Standardized<C> {
    /// Wrap `inner` with a not-yet-fitted scaler.
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            scaler: None,
        }
    }

    /// Borrow the wrapped classifier.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Borrow the fitted scaler, if any.
    #[must_use]
    pub fn scaler(&self) -> Option<&StandardScaler> {
        self.scaler.as_ref()
    }
}

impl<C: Classifier> Classifier for Standardized<C> {
    type Error = PipelineError<C::Error>;

    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), Self::Error> {
        let scaler = StandardScaler::fit(features).map_err(PipelineError::Scaling)?;
        let scaled = scaler.transform(features).map_err(PipelineError::Scaling)?;
        self.inner
            .fit(&scaled, labels)
            .map_err(PipelineError::Estimator)?;
        self.scaler = Some(scaler);
        Ok(())
    }

    fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, Self::Error> {
        let scaler = self
            .scaler
            .as_ref()
            .ok_or(PipelineError::Scaling(CvError::ScalerNotFitted))?;
        let scaled = scaler.transform(features).map_err(PipelineError::Scaling)?;
        self.inner
            .predict_batch(&scaled)
            .map_err(PipelineError::Estimator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_centered_and_scaled() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();
        assert_eq!(scaler.mean(), &[2.0, 10.0]);
        // Constant column keeps unit scale.
        assert_eq!(scaler.scale(), &[1.0, 1.0]);
        let out = scaler.transform(&rows).unwrap();
        assert_eq!(out, vec![vec![-1.0, 0.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(StandardScaler::fit(&[]), Err(CvError::EmptyDataset)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            StandardScaler::fit(&rows),
            Err(CvError::LengthMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("unused")]
    struct Never;

    /// Records the rows it was fitted on.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<Vec<f64>>,
    }

    impl Classifier for Recorder {
        type Error = Never;

        fn fit(&mut self, features: &[Vec<f64>], _labels: &[usize]) -> Result<(), Never> {
            self.seen = features.to_vec();
            Ok(())
        }

        fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, Never> {
            Ok(features.iter().map(|r| usize::from(r[0] > 0.0)).collect())
        }
    }

    #[test]
    fn wrapper_scales_before_fitting_and_predicting() {
        let mut model = Standardized::new(Recorder::default());
        model
            .fit(&[vec![0.0], vec![4.0]], &[0, 1])
            .unwrap();
        assert_eq!(model.inner().seen, vec![vec![-1.0], vec![1.0]]);
        // 3.0 maps to 0.5 with training statistics (mean 2, std 2).
        assert_eq!(model.predict_batch(&[vec![3.0], vec![1.0]]).unwrap(), vec![1, 0]);
    }

    #[test]
    fn predicting_before_fit_fails() {
        let model = Standardized::new(Recorder::default());
        assert!(matches!(
            model.predict_batch(&[vec![1.0]]),
            Err(PipelineError::Scaling(CvError::ScalerNotFitted))
        ));
    }
}
