//! Column ranges owned by each log in the concatenated unknown vector.

use std::ops::Range;

use crate::log::WellLog;

/// Cumulative log lengths starting at zero. Log `m` owns columns
/// `offset(m)..offset(m + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOffsets(Vec<usize>);

impl ColumnOffsets {
    /// Build offsets from per-log sample counts.
    pub fn from_lengths(lengths: impl IntoIterator<Item = usize>) -> Self {
        let mut offsets = vec![0];
        let mut total = 0;
        for len in lengths {
            total += len;
            offsets.push(total);
        }
        Self(offsets)
    }

    /// Build offsets from the depth counts of `logs`.
    pub fn from_logs(logs: &[WellLog]) -> Self {
        Self::from_lengths(logs.iter().map(WellLog::len))
    }

    /// Return the first column of log `m`.
    #[must_use]
    pub fn offset(&self, m: usize) -> usize {
        self.0[m]
    }

    /// Return the columns owned by log `m`.
    #[must_use]
    pub fn range(&self, m: usize) -> Range<usize> {
        self.0[m]..self.0[m + 1]
    }

    /// Return the number of logs.
    #[must_use]
    pub fn n_logs(&self) -> usize {
        self.0.len() - 1
    }

    /// Return the total number of columns.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0[self.0.len() - 1]
    }
}
