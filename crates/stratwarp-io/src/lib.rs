//! Well-log loading and result writing for the stratwarp pipeline.

mod domain;
mod error;
mod las;
mod reader;
mod writer;

pub use domain::ExperimentName;
pub use error::IoError;
pub use las::LasReader;
pub use reader::{CsvLogReader, read_log};
pub use writer::{DistanceSummary, LogEntry, MatrixEntry, ResultWriter, RunSummary, SolverEntry};
