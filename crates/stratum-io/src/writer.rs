//! JSON report writer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ExperimentName, is_valid_name};

/// Writes serializable reports to `{experiment}_{kind}.json`.
///
/// Creates the output directory on construction if it does not exist.
/// Each file wraps the report as
/// `{"experiment": ..., "kind": ..., "result": ...}`.
#[derive(Debug)]
pub struct ReportWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ReportWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    #[must_use]
    pub fn experiment(&self) -> &ExperimentName {
        &self.experiment
    }

    /// Path of the artifact for `kind`, whether or not it exists yet.
    #[must_use]
    pub fn artifact_path(&self, kind: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.json", self.experiment.as_str()))
    }

    /// Serialize `result` as pretty JSON to `{experiment}_{kind}.json` and
    /// return the written path. An existing file is overwritten.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`IoError::InvalidArtifactKind`] | `kind` is empty or outside `[a-zA-Z0-9_-]` |
    /// | [`IoError::Serialize`] | `result` cannot be represented as JSON |
    /// | [`IoError::WriteFile`] | the file cannot be written |
    #[instrument(skip(self, result))]
    pub fn write_artifact<T: Serialize + ?Sized>(
        &self,
        kind: &str,
        result: &T,
    ) -> Result<PathBuf, IoError> {
        if !is_valid_name(kind) {
            return Err(IoError::InvalidArtifactKind {
                kind: kind.to_string(),
            });
        }
        let path = self.artifact_path(kind);

        let artifact = Artifact {
            experiment: self.experiment.as_str(),
            kind,
            result,
        };
        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "report written");
        Ok(path)
    }
}

#[derive(Serialize)]
struct Artifact<'a, T: ?Sized> {
    experiment: &'a str,
    kind: &'a str,
    result: &'a T,
}
