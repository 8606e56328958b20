//! Relative geologic time estimation for sets of well logs.
//!
//! Every pair of logs is aligned with multichannel FastDTW. Each aligned
//! sample pair becomes one row of a sparse system stating that both samples
//! share an RGT. The system is solved for per-sample RGT increments bounded
//! below, and the running sum of each log's increments is its RGT curve.
//!
//! No file I/O happens here; see `stratwarp-io` for loading and writing.

mod align;
mod assemble;
mod build;
mod config;
mod error;
mod log;
mod matrix;
mod offsets;
mod paths;
mod prepare;
mod result;
mod solve;
mod sparse;

pub use align::{PairAligner, PairwiseAlignment};
pub use assemble::assemble;
pub use build::ConstraintBuilder;
pub use config::RgtConfig;
pub use error::{PrepareError, RgtError};
pub use log::{Channel, WellLog};
pub use matrix::DistanceMatrix;
pub use offsets::ColumnOffsets;
pub use paths::PathTable;
pub use prepare::{PrepareConfig, fill_missing, normalize};
pub use result::RgtResult;
pub use solve::{BoundedLeastSquares, Solution, SolveReport};
pub use sparse::ConstraintMatrix;
pub use stratwarp_dtw::{Dtw, SampleMetric};
