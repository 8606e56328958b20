//! Outcome of warping one series onto another.

/// Sample `a` of the first series matched to sample `b` of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WarpingStep {
    pub a: usize,
    pub b: usize,
}

/// Accumulated cost and matched sample pairs of one alignment.
///
/// Steps run from `(0, 0)` to `(n-1, m-1)`; each one advances `a`, `b` or
/// both by exactly one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Warping {
    cost: f64,
    steps: Vec<WarpingStep>,
}

impl Warping {
    pub(crate) fn new(cost: f64, steps: Vec<WarpingStep>) -> Self {
        Self { cost, steps }
    }

    /// Sum of the sample metric over every step.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of samples of each series the warping spans.
    #[must_use]
    pub fn extent(&self) -> (usize, usize) {
        self.steps.last().map_or((0, 0), |s| (s.a + 1, s.b + 1))
    }
}

impl<'a> IntoIterator for &'a Warping {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
