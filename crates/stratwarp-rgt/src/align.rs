//! Pairwise alignment of every log against every other log.

use rayon::prelude::*;
use stratwarp_dtw::{Dtw, Warping};
use tracing::{debug, info, instrument};

use crate::error::RgtError;
use crate::log::WellLog;
use crate::matrix::DistanceMatrix;
use crate::paths::PathTable;

/// Distances and warping paths for all pairs `i < j`.
#[derive(Debug, Clone)]
pub struct PairwiseAlignment {
    /// Warping distance of every pair.
    pub distances: DistanceMatrix,
    /// Warping path of every pair, trimmed to the longest path.
    pub paths: PathTable,
}

/// Runs FastDTW over every pair of logs on their shared channels.
///
/// Pairs are aligned in parallel and committed in `(i, j)` order, so the
/// result and the first reported error do not depend on scheduling.
#[derive(Debug, Clone)]
pub struct PairAligner {
    dtw: Dtw,
    path_multiplier: f64,
}

impl PairAligner {
    /// Create an aligner. The path table holds
    /// `ceil(path_multiplier × longest log)` steps per pair.
    #[must_use]
    pub fn new(dtw: Dtw, path_multiplier: f64) -> Self {
        Self { dtw, path_multiplier }
    }

    /// Return the DTW configuration.
    #[must_use]
    pub fn dtw(&self) -> &Dtw {
        &self.dtw
    }

    /// Return the per-pair path capacity for logs whose longest has
    /// `max_len` samples.
    #[must_use]
    pub fn path_capacity(&self, max_len: usize) -> usize {
        (self.path_multiplier * max_len as f64).ceil() as usize
    }

    /// Align every pair of logs.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::InvalidMultiplier`] | `path_multiplier` is not positive and finite |
    /// | [`RgtError::TooFewLogs`] | Fewer than two logs |
    /// | [`RgtError::EmptyLog`] | A log has no samples |
    /// | [`RgtError::NoSharedChannels`] | A pair of logs has no channel in common |
    /// | [`RgtError::MissingValue`] | A shared channel still has a missing sample |
    /// | [`RgtError::PathCapacityExceeded`] | A path is longer than the path capacity |
    #[instrument(skip(self, logs), fields(n_logs = logs.len()))]
    pub fn align(&self, logs: &[WellLog]) -> Result<PairwiseAlignment, RgtError> {
        if !(self.path_multiplier.is_finite() && self.path_multiplier > 0.0) {
            return Err(RgtError::InvalidMultiplier {
                name: "path_multiplier",
                value: self.path_multiplier,
            });
        }
        validate_logs(logs)?;

        let n = logs.len();
        let max_len = logs.iter().map(WellLog::len).max().unwrap_or(0);
        let capacity = self.path_capacity(max_len);
        debug!(max_len, capacity, "path table allocated");

        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();

        let aligned: Vec<Result<Warping, RgtError>> = pairs
            .par_iter()
            .map(|&(i, j)| self.align_pair(logs, i, j))
            .collect();

        let mut distances = DistanceMatrix::zeros(n);
        let mut paths = PathTable::with_capacity(n, capacity);
        for (&(i, j), result) in pairs.iter().zip(aligned) {
            let warping = result?;
            paths.insert(i, j, &warping)?;
            distances.set(i, j, warping.cost());
            debug!(i, j, distance = warping.cost(), path_len = warping.len(), "pair aligned");
        }
        paths.trim();

        info!(
            n_pairs = pairs.len(),
            total_steps = paths.total_steps(),
            max_path_len = paths.max_len(),
            "pairwise alignment complete"
        );
        Ok(PairwiseAlignment { distances, paths })
    }

    fn align_pair(&self, logs: &[WellLog], i: usize, j: usize) -> Result<Warping, RgtError> {
        let shared = logs[i].shared_channels(&logs[j]);
        if shared.is_empty() {
            return Err(RgtError::NoSharedChannels { i, j });
        }
        let a = logs[i].samples(i, &shared)?;
        let b = logs[j].samples(j, &shared)?;
        Ok(self.dtw.warp(a.as_view(), b.as_view())?)
    }
}

pub(crate) fn validate_logs(logs: &[WellLog]) -> Result<(), RgtError> {
    if logs.len() < 2 {
        return Err(RgtError::TooFewLogs { n_logs: logs.len() });
    }
    if let Some(index) = logs.iter().position(WellLog::is_empty) {
        return Err(RgtError::EmptyLog { index });
    }
    Ok(())
}
