//! Preallocated table of pairwise warping paths.

use stratwarp_dtw::Warping;

use crate::error::RgtError;

/// Warping paths for every pair of logs in a fixed-capacity 3-D layout.
///
/// Slot `(i, j, k)` holds the sample index in log `i` of step `k` of the path
/// between logs `i` and `j`; slot `(j, i, k)` holds the matching index in log
/// `j`. Path lengths are recorded for `i < j` and read symmetrically.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTable {
    n: usize,
    capacity: usize,
    steps: Vec<usize>,
    lengths: Vec<usize>,
}

impl PathTable {
    /// Allocate room for `n × n` paths of at most `capacity` steps each.
    pub(crate) fn with_capacity(n: usize, capacity: usize) -> Self {
        Self {
            n,
            capacity,
            steps: vec![0; n * n * capacity],
            lengths: vec![0; n * n],
        }
    }

    fn slot(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.n + j) * self.capacity + k
    }

    /// Store the path between logs `i < j`. Its steps pair log `i` (first
    /// coordinate) with log `j` (second coordinate).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::PathCapacityExceeded`] | The path is longer than the capacity |
    pub(crate) fn insert(&mut self, i: usize, j: usize, path: &Warping) -> Result<(), RgtError> {
        debug_assert!(i < j && j < self.n);
        if path.len() > self.capacity {
            return Err(RgtError::PathCapacityExceeded {
                i,
                j,
                len: path.len(),
                capacity: self.capacity,
            });
        }
        for (k, step) in path.into_iter().enumerate() {
            let forward = self.slot(i, j, k);
            let backward = self.slot(j, i, k);
            self.steps[forward] = step.a;
            self.steps[backward] = step.b;
        }
        self.lengths[i * self.n + j] = path.len();
        Ok(())
    }

    /// Shrink the capacity to the longest stored path.
    pub(crate) fn trim(&mut self) {
        let max_len = self.max_len();
        if max_len == self.capacity {
            return;
        }
        let mut steps = vec![0; self.n * self.n * max_len];
        for block in 0..self.n * self.n {
            let src = block * self.capacity;
            let dst = block * max_len;
            steps[dst..dst + max_len].copy_from_slice(&self.steps[src..src + max_len]);
        }
        self.steps = steps;
        self.capacity = max_len;
    }

    /// Return the number of logs.
    #[must_use]
    pub fn n_logs(&self) -> usize {
        self.n
    }

    /// Return the per-path step capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the length of the path between logs `i` and `j`, in either order.
    /// The diagonal reads as zero.
    #[must_use]
    pub fn len(&self, i: usize, j: usize) -> usize {
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        if lo == hi {
            return 0;
        }
        self.lengths[lo * self.n + hi]
    }

    /// Iterate over the steps `(index in i, index in j)` of the path between
    /// logs `i` and `j`.
    pub fn steps(&self, i: usize, j: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let len = self.len(i, j);
        let fwd = self.slot(i, j, 0);
        let bwd = self.slot(j, i, 0);
        (0..len).map(move |k| (self.steps[fwd + k], self.steps[bwd + k]))
    }

    /// Return the sum of all stored path lengths.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.lengths.iter().sum()
    }

    /// Return the longest stored path length.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.lengths.iter().copied().max().unwrap_or(0)
    }

    /// Return the `n × n` path-length table, symmetric with zero diagonal.
    #[must_use]
    pub fn length_table(&self) -> Vec<Vec<usize>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.len(i, j)).collect())
            .collect()
    }
}
