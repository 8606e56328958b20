//! Warping distance and path computation.

use tracing::instrument;

use crate::error::DtwError;
use crate::metric::SampleMetric;
use crate::series::SeriesView;
use crate::warp::{Warping, WarpingStep};
use crate::window::SearchWindow;

/// Immutable DTW configuration. Thread-safe and cheap to clone.
///
/// With a radius set (the default, radius 1) the path is found with FastDTW:
/// both series are halved recursively, the coarse path is projected back and
/// widened by `radius` cells, and only that window of the cost grid is filled.
/// The result is locally optimal inside the window, not globally optimal.
#[derive(Debug, Clone)]
pub struct Dtw {
    metric: SampleMetric,
    radius: Option<usize>,
}

impl Dtw {
    /// Create a FastDTW calculator with refinement radius 1.
    #[must_use]
    pub fn new(metric: SampleMetric) -> Self {
        Self {
            metric,
            radius: Some(1),
        }
    }

    /// Create a calculator that fills the whole cost grid.
    #[must_use]
    pub fn exact(metric: SampleMetric) -> Self {
        Self {
            metric,
            radius: None,
        }
    }

    /// Set the FastDTW refinement radius.
    #[must_use]
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Return the per-sample metric.
    #[must_use]
    pub fn metric(&self) -> &SampleMetric {
        &self.metric
    }

    /// Return the refinement radius, or `None` for exact DTW.
    #[must_use]
    pub fn radius(&self) -> Option<usize> {
        self.radius
    }

    /// Compute the warping distance between two series.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ChannelMismatch`] | The series have different channel counts |
    pub fn distance(&self, a: SeriesView<'_>, b: SeriesView<'_>) -> Result<f64, DtwError> {
        self.warp(a, b).map(|w| w.cost())
    }

    /// Warp `a` onto `b`, returning the matched sample pairs and their
    /// accumulated cost.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ChannelMismatch`] | The series have different channel counts |
    #[instrument(skip(self, a, b), fields(n = a.len(), m = b.len()))]
    pub fn warp(&self, a: SeriesView<'_>, b: SeriesView<'_>) -> Result<Warping, DtwError> {
        if a.n_channels() != b.n_channels() {
            return Err(DtwError::ChannelMismatch {
                left: a.n_channels(),
                right: b.n_channels(),
            });
        }
        let (dist, steps) = match self.radius {
            Some(radius) => self.fast(a, b, radius),
            None => self.windowed(a, b, &SearchWindow::full(a.len(), b.len())),
        };
        Ok(Warping::new(dist, steps))
    }

    /// Recursive FastDTW. Falls back to the full grid once either series is
    /// shorter than `radius + 2`.
    fn fast(&self, a: SeriesView<'_>, b: SeriesView<'_>, radius: usize) -> (f64, Vec<WarpingStep>) {
        let min_len = radius + 2;
        if a.len() < min_len || b.len() < min_len {
            return self.windowed(a, b, &SearchWindow::full(a.len(), b.len()));
        }

        let coarse_a = a.halve();
        let coarse_b = b.halve();
        let (_, coarse_path) = self.fast(coarse_a.as_view(), coarse_b.as_view(), radius);

        let window = SearchWindow::from_coarse_path(&coarse_path, a.len(), b.len(), radius);
        self.windowed(a, b, &window)
    }

    /// Cost-grid DP restricted to `window`, followed by traceback.
    ///
    /// Rows are stored ragged: row `i` starts at `offsets[i]` in the flat
    /// buffers and holds `window.column_range(i).len()` cells. Direction bits
    /// are 0 = diagonal, 1 = above, 2 = left.
    fn windowed(
        &self,
        a: SeriesView<'_>,
        b: SeriesView<'_>,
        window: &SearchWindow,
    ) -> (f64, Vec<WarpingStep>) {
        let n = a.len();
        let m = b.len();

        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0usize);
        for i in 0..n {
            offsets.push(offsets[i] + window.column_range(i).len());
        }

        let mut cost = vec![f64::INFINITY; offsets[n]];
        let mut dirs = vec![0u8; offsets[n]];

        let at = |cost: &[f64], i: usize, j: usize| -> f64 {
            let range = window.column_range(i);
            if range.contains(&j) {
                cost[offsets[i] + j - range.start]
            } else {
                f64::INFINITY
            }
        };

        for i in 0..n {
            let range = window.column_range(i);
            for j in range.clone() {
                let c = self.metric.distance(a.sample(i), b.sample(j));
                let idx = offsets[i] + j - range.start;

                if i == 0 && j == 0 {
                    cost[idx] = c;
                    continue;
                }

                let diag = if i > 0 && j > 0 { at(&cost, i - 1, j - 1) } else { f64::INFINITY };
                let above = if i > 0 { at(&cost, i - 1, j) } else { f64::INFINITY };
                let left = if j > range.start { cost[idx - 1] } else { f64::INFINITY };

                let (min_val, dir) = if diag <= above && diag <= left {
                    (diag, 0u8)
                } else if above <= left {
                    (above, 1u8)
                } else {
                    (left, 2u8)
                };

                cost[idx] = c + min_val;
                dirs[idx] = dir;
            }
        }

        // Traceback from (n-1, m-1) to (0, 0).
        let mut path = Vec::with_capacity(n + m);
        let mut i = n - 1;
        let mut j = m - 1;
        loop {
            path.push(WarpingStep { a: i, b: j });
            if i == 0 && j == 0 {
                break;
            }
            let idx = offsets[i] + j - window.column_range(i).start;
            match dirs[idx] {
                0 => {
                    i -= 1;
                    j -= 1;
                }
                1 => i -= 1,
                2 => j -= 1,
                _ => unreachable!("invalid direction byte"),
            }
        }
        path.reverse();

        let dist = at(&cost, n - 1, m - 1);
        (dist, path)
    }
}
