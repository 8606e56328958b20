//! Summary of an RGT estimation run.

use crate::error::RgtError;
use crate::matrix::DistanceMatrix;
use crate::paths::PathTable;
use crate::solve::SolveReport;

/// Everything an estimation run produced besides the RGT curves, which are
/// attached to the logs themselves.
#[derive(Debug, Clone)]
pub struct RgtResult {
    distances: DistanceMatrix,
    paths: PathTable,
    matrix_shape: (usize, usize),
    nnz: usize,
    report: SolveReport,
}

impl RgtResult {
    pub(crate) fn new(
        distances: DistanceMatrix,
        paths: PathTable,
        matrix_shape: (usize, usize),
        nnz: usize,
        report: SolveReport,
    ) -> Self {
        Self {
            distances,
            paths,
            matrix_shape,
            nnz,
            report,
        }
    }

    /// Borrow the pairwise warping distances.
    #[must_use]
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Borrow the pairwise warping paths.
    #[must_use]
    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    /// Return the `(rows, columns)` of the constraint matrix.
    #[must_use]
    pub fn matrix_shape(&self) -> (usize, usize) {
        self.matrix_shape
    }

    /// Return the nonzero count of the constraint matrix.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    /// Return the solver report.
    #[must_use]
    pub fn report(&self) -> &SolveReport {
        &self.report
    }

    /// Return whether the solver converged.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.report.converged
    }

    /// Pass the result through only if the solver converged.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::NotConverged`] | The solver stopped on its iteration budget |
    pub fn require_converged(self) -> Result<Self, RgtError> {
        if self.report.converged {
            Ok(self)
        } else {
            Err(RgtError::NotConverged {
                iterations: self.report.iterations,
                cost: self.report.cost,
            })
        }
    }
}
