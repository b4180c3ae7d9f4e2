//! Cross-validation for from-scratch classifiers: split, fit, score.
//!
//! Provides stratified and plain k-fold, leave-one-out, and stratified
//! holdout splitters, a [`Classifier`] trait for estimators, pluggable
//! [`Scorer`]s, confusion-matrix metrics, and a per-fold evaluator.

mod classifier;
mod confusion;
mod error;
mod eval;
mod fold;
mod holdout;
mod kfold;
mod metrics;
mod scaler;
mod splitter;
mod stratified;

pub use classifier::Classifier;
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use error::CvError;
pub use eval::{CrossValidationResult, FoldScore, ScoreSummary, cross_validate};
pub use fold::{Fold, take};
pub use holdout::StratifiedHoldout;
pub use kfold::{KFold, LeaveOneOut};
pub use metrics::{Accuracy, BalancedAccuracy, MacroSensitivity, MacroSpecificity, Scorer, accuracy};
pub use scaler::{PipelineError, StandardScaler, Standardized};
pub use splitter::Splitter;
pub use stratified::StratifiedKFold;
