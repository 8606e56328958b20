//! Errors raised while reading logs and writing results.

use std::path::PathBuf;

use stratwarp_rgt::RgtError;

/// Everything that can go wrong between a log file on disk and the
/// artifacts written after estimation. Every variant carries the path
/// involved.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("cannot open {path}")]
    FileNotFound { path: PathBuf, source: std::io::Error },

    /// Extension other than `.las` or `.csv`.
    #[error("{path}: unsupported log format, expected .las or .csv")]
    UnsupportedFormat { path: PathBuf },

    /// The CSV tokenizer rejected a record; `offset` is in bytes.
    #[error("{path}: malformed CSV near byte {offset}")]
    CsvParse {
        path: PathBuf,
        offset: u64,
        source: csv::Error,
    },

    /// A LAS file lacks a section needed to build a log, such as `~C`
    /// (curve definitions) or `~A` (data).
    #[error("{path}: no {section} section")]
    MissingSection {
        path: PathBuf,
        section: &'static str,
    },

    #[error("{path}: wrapped LAS (WRAP. YES) is not supported")]
    WrappedLas { path: PathBuf },

    /// A header line that is not `MNEM.UNIT VALUE : DESCRIPTION`.
    /// `line` is one-based.
    #[error("{path}:{line}: cannot parse header line \"{content}\"")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("{path}: no depth samples")]
    EmptyDataset { path: PathBuf },

    /// A data row whose value count differs from the curve (LAS) or header
    /// (CSV) count. `row_index` is zero-based over data rows.
    #[error("{path}: data row {row_index} has {got} values where {expected} were declared")]
    InconsistentRowLength {
        path: PathBuf,
        row_index: usize,
        expected: usize,
        got: usize,
    },

    /// A cell that is neither a finite number nor a missing marker, or a
    /// missing depth. `col_index` counts the depth column as 0.
    #[error("{path}: row {row_index}, column {col_index}: \"{raw}\" is not a finite number")]
    NonFiniteValue {
        path: PathBuf,
        row_index: usize,
        col_index: usize,
        raw: String,
    },

    /// The parsed curves were rejected by [`stratwarp_rgt::WellLog`],
    /// e.g. a repeated mnemonic.
    #[error("{path}: curves do not form a valid log")]
    InvalidLog { path: PathBuf, source: RgtError },

    #[error("experiment name \"{name}\" may only use [a-zA-Z0-9_-]")]
    InvalidExperimentName { name: String },

    #[error("log \"{log}\" has not been assigned an RGT")]
    MissingRgt { log: String },

    #[error("cannot create output directory {path}")]
    OutputDirCreate { path: PathBuf, source: std::io::Error },

    #[error("cannot write {path}")]
    WriteFile { path: PathBuf, source: std::io::Error },

    #[error("cannot write CSV {path}")]
    WriteCsv { path: PathBuf, source: csv::Error },

    #[error("cannot serialize {path}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}
