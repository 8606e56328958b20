//! Per-sample distance measures used inside the warping cost grid.

use std::fmt;
use std::sync::Arc;

use crate::error::DtwError;

/// Caller-supplied distance between two equal-length sample vectors.
pub type DistanceFn = dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync;

/// Distance between two samples restricted to the same channels.
///
/// `Norm(p)` is `(Σ |aₖ - bₖ|^p)^(1/p)`. Orders below one (the 1/8 default
/// used for log alignment) are allowed even though they do not satisfy the
/// triangle inequality. `p = ∞` is the largest absolute difference.
#[derive(Clone)]
pub enum SampleMetric {
    /// p-norm of the element-wise difference.
    Norm(f64),
    /// Arbitrary non-negative distance function.
    Custom(Arc<DistanceFn>),
}

impl SampleMetric {
    /// Create a p-norm metric.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidNormOrder`] | `p` is NaN, zero or negative |
    pub fn norm(p: f64) -> Result<Self, DtwError> {
        if p.is_nan() || p <= 0.0 {
            return Err(DtwError::InvalidNormOrder { p });
        }
        Ok(Self::Norm(p))
    }

    /// Wrap a closure as a metric.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Evaluate the distance between two samples.
    #[must_use]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        match self {
            Self::Norm(p) => p_norm(a, b, *p),
            Self::Custom(f) => f(a, b),
        }
    }
}

fn p_norm(a: &[f64], b: &[f64], p: f64) -> f64 {
    let diffs = a.iter().zip(b).map(|(x, y)| (x - y).abs());
    if p.is_infinite() {
        return diffs.fold(0.0, f64::max);
    }
    if p == 1.0 {
        return diffs.sum();
    }
    if p == 2.0 {
        return diffs.map(|d| d * d).sum::<f64>().sqrt();
    }
    diffs.map(|d| d.powf(p)).sum::<f64>().powf(p.recip())
}

impl Default for SampleMetric {
    fn default() -> Self {
        Self::Norm(0.125)
    }
}

impl fmt::Debug for SampleMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Norm(p) => f.debug_tuple("Norm").field(p).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
