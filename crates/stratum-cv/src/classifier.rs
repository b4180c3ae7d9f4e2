/// A supervised classifier that can be refitted and queried in batches.
///
/// The evaluator builds a fresh instance per fold through a factory, so
/// implementations never need to reset state between folds.
pub trait Classifier {
    /// Error produced by fitting or prediction.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fit on row-major `features` with one label per row.
    ///
    /// # Errors
    ///
    /// Implementations return their own validation errors.
    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), Self::Error>;

    /// Predict one label per row of `features`.
    ///
    /// # Errors
    ///
    /// Implementations return an error when called before a successful fit or
    /// when the rows have the wrong number of features.
    fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, Self::Error>;
}
