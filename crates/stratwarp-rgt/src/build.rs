//! Sparse consistency system built from pairwise warping paths.

use faer::sparse::Triplet;
use tracing::{info, instrument};

use crate::error::RgtError;
use crate::offsets::ColumnOffsets;
use crate::paths::PathTable;
use crate::sparse::ConstraintMatrix;

/// Builds the matrix `A` whose rows state that aligned samples share an RGT.
///
/// For every pair `i < j` and every path step `(a, b)` there is one row with
/// `+1` on columns `offset(i)..=offset(i) + a` and `-1` on columns
/// `offset(j)..=offset(j) + b`, so that `A · dRGT = 0` equates the cumulative
/// RGT of both samples.
///
/// The nonzero budget is `rows × ceil(row_multiplier × longest log)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintBuilder {
    row_multiplier: f64,
}

impl Default for ConstraintBuilder {
    fn default() -> Self {
        Self { row_multiplier: 2.0 }
    }
}

impl ConstraintBuilder {
    /// Create a builder with the given per-row nonzero multiplier.
    #[must_use]
    pub fn new(row_multiplier: f64) -> Self {
        Self { row_multiplier }
    }

    /// Return the nonzero budget for `rows` rows over logs whose longest has
    /// `max_len` samples, or `None` if it overflows `usize`.
    #[must_use]
    pub fn nonzero_capacity(&self, rows: usize, max_len: usize) -> Option<usize> {
        let per_row = (self.row_multiplier * max_len as f64).ceil();
        if per_row >= usize::MAX as f64 {
            return None;
        }
        rows.checked_mul(per_row as usize)
    }

    /// Assemble the constraint matrix.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::InvalidMultiplier`] | `row_multiplier` is not positive and finite |
    /// | [`RgtError::NonzeroCapacityExceeded`] | The rows need more nonzeros than the budget |
    /// | [`RgtError::SparseAssembly`] | faer cannot allocate the matrix |
    #[instrument(skip(self, paths, offsets), fields(n_logs = offsets.n_logs()))]
    pub fn build(
        &self,
        paths: &PathTable,
        offsets: &ColumnOffsets,
    ) -> Result<ConstraintMatrix, RgtError> {
        if !(self.row_multiplier.is_finite() && self.row_multiplier > 0.0) {
            return Err(RgtError::InvalidMultiplier {
                name: "row_multiplier",
                value: self.row_multiplier,
            });
        }
        let n = offsets.n_logs();
        let max_len = (0..n).map(|m| offsets.range(m).len()).max().unwrap_or(0);
        let rows = paths.total_steps();
        let capacity = self.nonzero_capacity(rows, max_len).unwrap_or(usize::MAX);

        let required = count_nonzeros(paths, n).ok_or(RgtError::NonzeroCapacityExceeded {
            required: usize::MAX,
            capacity,
        })?;
        if required > capacity {
            return Err(RgtError::NonzeroCapacityExceeded { required, capacity });
        }

        let mut entries = Vec::with_capacity(required);
        let mut row = 0;
        for i in 0..n {
            for j in i + 1..n {
                let (off_i, off_j) = (offsets.offset(i), offsets.offset(j));
                for (a, b) in paths.steps(i, j) {
                    entries.extend((off_i..=off_i + a).map(|c| Triplet::new(row, c, 1.0)));
                    entries.extend((off_j..=off_j + b).map(|c| Triplet::new(row, c, -1.0)));
                    row += 1;
                }
            }
        }
        debug_assert_eq!(entries.len(), required);
        debug_assert_eq!(row, rows);

        let matrix = ConstraintMatrix::from_triplets(rows, offsets.total(), &entries)?;
        info!(
            rows = matrix.shape().0,
            cols = matrix.shape().1,
            nnz = matrix.nnz(),
            capacity,
            "constraint matrix built"
        );
        Ok(matrix)
    }
}

/// Exact nonzero count: each step `(a, b)` contributes `a + 1 + b + 1`.
fn count_nonzeros(paths: &PathTable, n: usize) -> Option<usize> {
    let mut total: usize = 0;
    for i in 0..n {
        for j in i + 1..n {
            for (a, b) in paths.steps(i, j) {
                total = total.checked_add(a)?.checked_add(b)?.checked_add(2)?;
            }
        }
    }
    Some(total)
}
