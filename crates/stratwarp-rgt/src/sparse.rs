//! Consistency matrix storage on top of faer's sparse row-major format.

use faer::sparse::{SparseRowMat, SparseRowMatRef, Triplet};
use faer::{Col, ColRef};

use crate::error::RgtError;

/// The sparse system `A` with an implicit zero right-hand side.
///
/// Rows are stored compressed; products with dense vectors go through
/// faer's sparse-dense kernels.
#[derive(Debug, Clone)]
pub struct ConstraintMatrix {
    inner: SparseRowMat<usize, f64>,
}

impl ConstraintMatrix {
    /// Assemble from `(row, col, value)` entries. Entries sharing a position
    /// are summed.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::SparseAssembly`] | An entry is out of bounds or allocation fails |
    pub(crate) fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        entries: &[Triplet<usize, usize, f64>],
    ) -> Result<Self, RgtError> {
        let inner = SparseRowMat::try_new_from_triplets(n_rows, n_cols, entries).map_err(|e| {
            RgtError::SparseAssembly {
                reason: format!("{e:?}"),
            }
        })?;
        Ok(Self { inner })
    }

    /// Borrow the underlying faer matrix.
    #[must_use]
    pub fn as_faer(&self) -> SparseRowMatRef<'_, usize, f64> {
        self.inner.as_ref()
    }

    /// Return `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.inner.nrows(), self.inner.ncols())
    }

    /// Return the number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.as_faer().compute_nnz()
    }

    /// Return the column indices and values of row `r`.
    #[must_use]
    pub fn row(&self, r: usize) -> (&[usize], &[f64]) {
        let a = self.as_faer();
        (a.col_idx_of_row_raw(r), a.val_of_row(r))
    }

    /// Compute `A · x`.
    ///
    /// # Panics
    ///
    /// Panics if `x.len()` differs from the column count.
    #[must_use]
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(x.len(), self.inner.ncols(), "vector length must match column count");
        let y: Col<f64> = self.as_faer() * ColRef::from_slice(x);
        to_vec(&y)
    }

    /// Compute `Aᵀ · y`.
    ///
    /// # Panics
    ///
    /// Panics if `y.len()` differs from the row count.
    #[must_use]
    pub fn mul_transpose_vec(&self, y: &[f64]) -> Vec<f64> {
        assert_eq!(y.len(), self.inner.nrows(), "vector length must match row count");
        let x: Col<f64> = self.as_faer().transpose() * ColRef::from_slice(y);
        to_vec(&x)
    }
}

fn to_vec(col: &Col<f64>) -> Vec<f64> {
    (0..col.nrows()).map(|i| col[i]).collect()
}
