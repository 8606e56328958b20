//! CSV well-log reader and format dispatch.

use std::path::{Path, PathBuf};

use stratwarp_rgt::WellLog;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::las::LasReader;

/// Reads one well log from a depth-indexed CSV table.
///
/// ```text
/// depth,GR,DT
/// 1000.0,45.2,
/// 1000.5,47.9,88.1
/// ```
///
/// The first column is depth and every further column is a channel named by
/// its header. Empty cells, `NaN` and `nan` mark missing channel values; the
/// depth itself may never be missing. The log takes the file stem as name.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File cannot be opened |
/// | [`IoError::CsvParse`] | Tokenizer failure |
/// | [`IoError::EmptyDataset`] | Header but no rows |
/// | [`IoError::InconsistentRowLength`] | Row width differs from the header |
/// | [`IoError::NonFiniteValue`] | Unparseable or infinite cell, or a missing depth |
/// | [`IoError::InvalidLog`] | Repeated column name |
pub struct CsvLogReader {
    path: PathBuf,
}

impl CsvLogReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<WellLog, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|source| IoError::FileNotFound {
            path: self.path.clone(),
            source,
        })?;

        // Ragged rows are reported by the width check below, not by csv.
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let width = header.len();
        debug!(width, "CSV header read");

        let mut depths = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); width.saturating_sub(1)];
        for (row_index, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| self.csv_error(e))?;
            if record.len() != width {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: width,
                    got: record.len(),
                });
            }
            let mut cells = record.iter().enumerate();
            if let Some((_, raw)) = cells.next() {
                depths.push(self.parse_depth(raw, row_index)?);
            }
            for ((col_index, raw), column) in cells.zip(columns.iter_mut()) {
                column.push(self.parse_value(raw, row_index, col_index)?);
            }
        }

        if depths.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let name = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let log = header.iter().skip(1).zip(&columns).try_fold(
            WellLog::new(name, depths),
            |log, (channel, values)| log.with_raw_channel(channel, values),
        );
        let log = log.map_err(|source| IoError::InvalidLog {
            path: self.path.clone(),
            source,
        })?;
        info!(
            log = log.name(),
            n_samples = log.len(),
            n_channels = log.channels().len(),
            "CSV log loaded"
        );
        Ok(log)
    }

    fn parse_depth(&self, raw: &str, row_index: usize) -> Result<f64, IoError> {
        match self.parse_value(raw, row_index, 0)? {
            depth if depth.is_nan() => Err(self.bad_cell(raw, row_index, 0)),
            depth => Ok(depth),
        }
    }

    /// Missing markers become NaN.
    fn parse_value(&self, raw: &str, row_index: usize, col_index: usize) -> Result<f64, IoError> {
        if matches!(raw, "" | "NaN" | "nan") {
            return Ok(f64::NAN);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.bad_cell(raw, row_index, col_index))
    }

    fn bad_cell(&self, raw: &str, row_index: usize, col_index: usize) -> IoError {
        IoError::NonFiniteValue {
            path: self.path.clone(),
            row_index,
            col_index,
            raw: raw.to_string(),
        }
    }

    fn csv_error(&self, source: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: source.position().map_or(0, |p| p.byte()),
            source,
        }
    }
}

/// Read a log, choosing the parser by file extension (`las` or `csv`,
/// case-insensitive).
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] for any other extension, otherwise the
/// errors of [`LasReader`] or [`CsvLogReader`].
pub fn read_log(path: &Path) -> Result<WellLog, IoError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("las") => LasReader::new(path).read(),
        Some("csv") => CsvLogReader::new(path).read(),
        _ => Err(IoError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
