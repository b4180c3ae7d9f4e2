//! File I/O and serialization for the stratum command line.
//!
//! Loads labelled CSV datasets and writes JSON reports named after a
//! validated experiment.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ExperimentName, LabeledDataset};
pub use error::IoError;
pub use reader::DatasetReader;
pub use writer::ReportWriter;
