//! Upper-triangular matrix of pairwise warping distances.

/// Symmetric distance matrix over `n` logs stored as a flat upper triangle.
///
/// Only pairs `i < j` are stored, row by row: `(0,1), (0,2), .., (1,2), ..`.
/// Access is symmetric and the diagonal reads as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub(crate) fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n.saturating_sub(1) / 2],
        }
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < j && j < self.n);
        i * (2 * self.n - i - 1) / 2 + (j - i - 1)
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let k = self.offset(i, j);
        self.data[k] = value;
    }

    /// Return the number of logs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Return true if the matrix covers no logs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return the distance between logs `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n` or `j >= n`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of bounds for {} logs", self.n);
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => 0.0,
            std::cmp::Ordering::Less => self.data[self.offset(i, j)],
            std::cmp::Ordering::Greater => self.data[self.offset(j, i)],
        }
    }

    /// Iterate over stored pairs `(i, j, distance)` with `i < j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.n)
            .flat_map(move |i| (i + 1..self.n).map(move |j| (i, j)))
            .zip(self.data.iter())
            .map(|((i, j), &d)| (i, j, d))
    }

    /// Return the full `n × n` matrix as nested rows.
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_matrix() -> DistanceMatrix {
        let mut m = DistanceMatrix::zeros(4);
        let mut v = 1.0;
        for i in 0..4 {
            for j in i + 1..4 {
                m.set(i, j, v);
                v += 1.0;
            }
        }
        m
    }

    #[test]
    fn layout_is_row_major_upper_triangle() {
        let m = make_matrix();
        assert_eq!(m.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.get(0, 1), 1.0);
        assert_eq!(m.get(1, 2), 4.0);
        assert_eq!(m.get(2, 3), 6.0);
    }

    #[test]
    fn symmetric_with_zero_diagonal() {
        let m = make_matrix();
        for i in 0..4 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn iter_yields_upper_triangle_in_order() {
        let pairs: Vec<_> = make_matrix().iter().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], (0, 1, 1.0));
        assert_eq!(pairs[3], (1, 2, 4.0));
        assert_eq!(pairs[5], (2, 3, 6.0));
    }

    #[test]
    fn set_accepts_either_order() {
        let mut m = DistanceMatrix::zeros(3);
        m.set(2, 0, 9.0);
        assert_eq!(m.get(0, 2), 9.0);
    }

    #[test]
    fn dense_view_matches_get() {
        let dense = make_matrix().to_dense();
        assert_eq!(dense[3][1], 5.0);
        assert_eq!(dense[1][1], 0.0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_bounds_panics() {
        let _ = make_matrix().get(0, 4);
    }
}
