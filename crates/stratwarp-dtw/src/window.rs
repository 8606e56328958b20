//! Search windows restricting which cost-grid cells the warping DP visits.

use std::ops::Range;

use crate::warp::WarpingStep;

/// Per-row column ranges of the cost grid that the DP is allowed to fill.
///
/// Every row holds one contiguous range. Windows built by this module always
/// contain `(0, 0)` and `(n_rows - 1, n_cols - 1)` and are row-connected, so
/// at least one monotone path exists inside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWindow {
    n_cols: usize,
    rows: Vec<Range<usize>>,
}

impl SearchWindow {
    /// The unrestricted window covering every cell.
    #[must_use]
    pub fn full(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_cols,
            rows: vec![0..n_cols; n_rows],
        }
    }

    /// Project a path found on the half-resolution grid onto the full grid.
    ///
    /// Each coarse cell within `radius` (Chebyshev distance) of a coarse path
    /// step contributes its 2×2 block of fine cells.
    pub(crate) fn from_coarse_path(
        coarse: &[WarpingStep],
        n_rows: usize,
        n_cols: usize,
        radius: usize,
    ) -> Self {
        let mut lo = vec![usize::MAX; n_rows];
        let mut hi = vec![0usize; n_rows];
        let mut touched = vec![false; n_rows];

        for step in coarse {
            let col_start = 2 * step.b.saturating_sub(radius);
            let col_end = (2 * (step.b + radius) + 1).min(n_cols - 1);
            for ci in step.a.saturating_sub(radius)..=step.a + radius {
                for fine in [2 * ci, 2 * ci + 1] {
                    if fine >= n_rows {
                        continue;
                    }
                    lo[fine] = lo[fine].min(col_start);
                    hi[fine] = hi[fine].max(col_end);
                    touched[fine] = true;
                }
            }
        }

        let rows = (0..n_rows)
            .map(|i| {
                if touched[i] {
                    lo[i]..hi[i] + 1
                } else {
                    0..0
                }
            })
            .collect();

        let mut window = Self { n_cols, rows };
        window.connect();
        window
    }

    /// Make the window traversable from `(0, 0)` to the final cell.
    ///
    /// Untouched rows inherit the previous row's range, starts never move left
    /// of the previous start or beyond the previous end, and ends never shrink.
    fn connect(&mut self) {
        let n_cols = self.n_cols;
        let n_rows = self.rows.len();
        if n_rows == 0 {
            return;
        }
        self.rows[0].start = 0;
        if self.rows[0].end == 0 {
            self.rows[0].end = 1;
        }
        for i in 1..n_rows {
            let prev = self.rows[i - 1].clone();
            let row = &mut self.rows[i];
            if row.start >= row.end {
                *row = prev.clone();
            }
            row.start = row.start.max(prev.start).min(prev.end);
            row.end = row.end.max(prev.end).max(row.start + 1).min(n_cols);
        }
        self.rows[n_rows - 1].end = n_cols;
    }

    /// Return the valid column range for `row`.
    #[must_use]
    pub fn column_range(&self, row: usize) -> Range<usize> {
        self.rows[row].clone()
    }

    /// Return the number of grid rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of grid columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Return the total number of cells inside the window.
    #[must_use]
    pub fn n_cells(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(pairs: &[(usize, usize)]) -> Vec<WarpingStep> {
        pairs.iter().map(|&(a, b)| WarpingStep { a, b }).collect()
    }

    #[test]
    fn full_window_covers_everything() {
        let w = SearchWindow::full(3, 5);
        assert_eq!(w.n_cells(), 15);
        assert_eq!(w.column_range(2), 0..5);
    }

    #[test]
    fn diagonal_coarse_path_radius_zero() {
        let w = SearchWindow::from_coarse_path(&steps(&[(0, 0), (1, 1)]), 4, 4, 0);
        assert_eq!(w.column_range(0), 0..2);
        assert_eq!(w.column_range(1), 0..2);
        assert_eq!(w.column_range(2), 2..4);
        assert_eq!(w.column_range(3), 2..4);
    }

    #[test]
    fn radius_widens_and_clamps() {
        let w = SearchWindow::from_coarse_path(&steps(&[(0, 0), (1, 1)]), 4, 4, 1);
        for row in 0..4 {
            assert_eq!(w.column_range(row), 0..4, "row {row}");
        }
    }

    #[test]
    fn odd_trailing_row_is_covered() {
        // 5 fine rows, coarse path over 2 coarse rows, radius 0: row 4 is
        // outside every projected block and must inherit row 3.
        let w = SearchWindow::from_coarse_path(&steps(&[(0, 0), (1, 1)]), 5, 4, 0);
        assert_eq!(w.column_range(4), 2..4);
    }

    #[test]
    fn final_row_reaches_last_column() {
        // Odd column count: the last column is outside every 2x2 block.
        let w = SearchWindow::from_coarse_path(&steps(&[(0, 0), (1, 1)]), 4, 5, 0);
        assert_eq!(w.column_range(3).end, 5);
    }

    #[test]
    fn rows_stay_connected() {
        let w = SearchWindow::from_coarse_path(&steps(&[(0, 0), (1, 0), (2, 1), (2, 2)]), 6, 6, 0);
        for i in 1..w.n_rows() {
            let prev = w.column_range(i - 1);
            let row = w.column_range(i);
            assert!(row.start >= prev.start);
            assert!(row.start <= prev.end, "row {i} detached: {row:?} after {prev:?}");
            assert!(row.end >= prev.end);
        }
        assert_eq!(w.column_range(0).start, 0);
    }
}
