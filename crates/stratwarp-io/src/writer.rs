//! CSV and JSON writers for RGT estimation outputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use stratwarp_rgt::{DistanceMatrix, PathTable, RgtResult, WellLog};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes RGT curves and run summaries.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_rgt.csv`,
/// `{experiment}_summary.json` and `{experiment}_distances.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
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

    /// Return the path of the artifact with the given suffix.
    #[must_use]
    pub fn artifact_path(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(self.experiment.file_name(suffix))
    }

    /// Write every log's RGT to `{experiment}_rgt.csv` in long format:
    /// one `log,depth,rgt` row per sample.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::MissingRgt`] | A log has no RGT attached |
    /// | [`IoError::WriteCsv`] | The file cannot be written |
    #[instrument(skip_all, fields(n_logs = logs.len()))]
    pub fn write_rgt(&self, logs: &[WellLog]) -> Result<PathBuf, IoError> {
        let curves = logs
            .iter()
            .map(|log| {
                log.rgt().ok_or_else(|| IoError::MissingRgt {
                    log: log.name().to_string(),
                })
            })
            .collect::<Result<Vec<&[f64]>, IoError>>()?;

        let path = self.artifact_path("rgt.csv");
        let csv_error = |e: csv::Error| IoError::WriteCsv {
            path: path.clone(),
            source: e,
        };
        let mut wtr = csv::Writer::from_path(&path).map_err(csv_error)?;
        wtr.write_record(["log", "depth", "rgt"]).map_err(csv_error)?;
        for (log, rgt) in logs.iter().zip(curves) {
            for (&depth, &value) in log.depths().iter().zip(rgt) {
                wtr.serialize((log.name(), depth, value)).map_err(csv_error)?;
            }
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "rgt written");
        Ok(path)
    }

    /// Write a run summary to `{experiment}_summary.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The summary cannot be serialized |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_summary(&self, summary: &RunSummary) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("summary.json");
        self.write_json(&path, summary)?;
        info!(path = %path.display(), "summary written");
        Ok(path)
    }

    /// Write pairwise distances and path lengths to
    /// `{experiment}_distances.json`.
    ///
    /// # Errors
    ///
    /// Same as [`ResultWriter::write_summary`].
    #[instrument(skip_all)]
    pub fn write_distances(&self, summary: &DistanceSummary) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("distances.json");
        self.write_json(&path, summary)?;
        info!(path = %path.display(), "distances written");
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(value).map_err(|e| IoError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Per-log metadata in a summary.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log name.
    pub name: String,
    /// Number of depth samples.
    pub n_samples: usize,
    /// Channel names in file order.
    pub channels: Vec<String>,
    /// RGT of the first and last sample, when estimated.
    pub rgt_range: Option<(f64, f64)>,
}

impl LogEntry {
    fn from_log(log: &WellLog) -> Self {
        Self {
            name: log.name().to_string(),
            n_samples: log.len(),
            channels: log.channel_names().map(str::to_string).collect(),
            rgt_range: log
                .rgt()
                .and_then(|r| Some((*r.first()?, *r.last()?))),
        }
    }
}

/// Shape of the consistency system.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MatrixEntry {
    /// Number of rows (aligned sample pairs).
    pub rows: usize,
    /// Number of columns (samples over all logs).
    pub cols: usize,
    /// Stored nonzeros.
    pub nnz: usize,
}

/// Solver outcome.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SolverEntry {
    /// Whether the solver met a stopping criterion.
    pub converged: bool,
    /// Outer iterations performed.
    pub iterations: usize,
    /// Final cost ½‖A x‖².
    pub cost: f64,
    /// Infinity norm of the projected gradient.
    pub projected_gradient_norm: f64,
}

/// Pairwise alignment summary.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceSummary {
    /// Experiment name.
    pub experiment: String,
    /// Logs in input order.
    pub logs: Vec<LogEntry>,
    /// Dense symmetric distance matrix.
    pub distances: Vec<Vec<f64>>,
    /// Dense symmetric path-length table.
    pub path_lengths: Vec<Vec<usize>>,
}

impl DistanceSummary {
    /// Summarize a pairwise alignment.
    #[must_use]
    pub fn new(
        experiment: &ExperimentName,
        logs: &[WellLog],
        distances: &DistanceMatrix,
        paths: &PathTable,
    ) -> Self {
        Self {
            experiment: experiment.as_str().to_string(),
            logs: logs.iter().map(LogEntry::from_log).collect(),
            distances: distances.to_dense(),
            path_lengths: paths.length_table(),
        }
    }
}

/// Full estimation summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Logs, distances and path lengths.
    #[serde(flatten)]
    pub alignment: DistanceSummary,
    /// Consistency system shape.
    pub matrix: MatrixEntry,
    /// Solver outcome.
    pub solver: SolverEntry,
}

impl RunSummary {
    /// Summarize an estimation run over `logs`, which carry their RGT.
    #[must_use]
    pub fn new(experiment: &ExperimentName, logs: &[WellLog], result: &RgtResult) -> Self {
        let (rows, cols) = result.matrix_shape();
        let report = result.report();
        Self {
            alignment: DistanceSummary::new(experiment, logs, result.distances(), result.paths()),
            matrix: MatrixEntry {
                rows,
                cols,
                nnz: result.nnz(),
            },
            solver: SolverEntry {
                converged: report.converged,
                iterations: report.iterations,
                cost: report.cost,
                projected_gradient_norm: report.projected_gradient_norm,
            },
        }
    }
}
