//! CSV reader for labelled feature tables.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::LabeledDataset;

/// Reads a labelled dataset from a CSV file.
///
/// Expected CSV format:
/// - Header row required
/// - One label column (named `label` unless configured) holding
///   non-negative integers; it may sit at any position
/// - Every other column is a feature and must hold finite floats
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingLabelColumn`] | Header has no label column |
/// | [`IoError::NoFeatureColumns`] | Header has only the label column |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Feature cell is NaN, Inf, or unparseable |
/// | [`IoError::InvalidLabel`] | Label cell is not a non-negative integer |
#[derive(Debug, Clone)]
pub struct DatasetReader {
    path: PathBuf,
    label_column: String,
}

impl DatasetReader {
    /// Create a new reader for the given CSV file path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            label_column: "label".to_string(),
        }
    }

    /// Use a different header name for the label column.
    #[must_use]
    pub fn with_label_column(mut self, label_column: impl Into<String>) -> Self {
        self.label_column = label_column.into();
        self
    }

    /// Read and validate the CSV file.
    #[instrument(skip(self), fields(path = %self.path.display(), label = %self.label_column))]
    pub fn read(&self) -> Result<LabeledDataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // Flexible rows so ragged input reports InconsistentRowLength.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.parse_error(e))?.clone();
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let label_index = header
            .iter()
            .position(|h| h == self.label_column)
            .ok_or_else(|| IoError::MissingLabelColumn {
                path: self.path.clone(),
                column: self.label_column.clone(),
            })?;
        if expected_cols < 2 {
            return Err(IoError::NoFeatureColumns {
                path: self.path.clone(),
            });
        }

        let feature_names: Vec<String> = header
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != label_index)
            .map(|(_, h)| h.to_string())
            .collect();

        let mut features = Vec::new();
        let mut labels = Vec::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.parse_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut row = Vec::with_capacity(feature_names.len());
            for (col_index, raw) in record.iter().enumerate() {
                if col_index == label_index {
                    let label: usize = raw.parse().map_err(|_| IoError::InvalidLabel {
                        path: self.path.clone(),
                        row_index,
                        raw: raw.to_string(),
                    })?;
                    labels.push(label);
                    continue;
                }
                match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() => row.push(value),
                    _ => {
                        return Err(IoError::NonFiniteValue {
                            path: self.path.clone(),
                            row_index,
                            column: header.get(col_index).unwrap_or_default().to_string(),
                            raw: raw.to_string(),
                        });
                    }
                }
            }
            features.push(row);
        }

        if features.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_samples = features.len(),
            n_features = feature_names.len(),
            "labelled dataset loaded"
        );

        Ok(LabeledDataset::new(feature_names, features, labels))
    }

    fn parse_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
