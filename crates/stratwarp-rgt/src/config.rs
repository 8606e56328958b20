//! Configuration builder and entry point for RGT estimation.

use stratwarp_dtw::{Dtw, SampleMetric};
use tracing::{info, instrument};

use crate::align::{PairAligner, PairwiseAlignment};
use crate::assemble::assemble;
use crate::build::ConstraintBuilder;
use crate::error::RgtError;
use crate::log::WellLog;
use crate::offsets::ColumnOffsets;
use crate::result::RgtResult;
use crate::solve::BoundedLeastSquares;

const DEFAULT_MAX_ITER: usize = 100;

/// Configuration for RGT estimation.
///
/// Construct via [`RgtConfig::new`] or [`Default`], then chain `with_*`
/// methods.
///
/// # Defaults
///
/// | Parameter         | Default         |
/// |-------------------|-----------------|
/// | `metric`          | `Norm(0.125)`   |
/// | `radius`          | 1               |
/// | `max_iter`        | `None` (→ 100)  |
/// | `path_multiplier` | 1.5             |
/// | `row_multiplier`  | 2.0             |
/// | `lower_bound`     | 1.0             |
/// | `tol`             | 1e-10           |
#[derive(Debug, Clone)]
pub struct RgtConfig {
    pub(crate) metric: SampleMetric,
    pub(crate) radius: usize,
    pub(crate) max_iter: Option<usize>,
    pub(crate) path_multiplier: f64,
    pub(crate) row_multiplier: f64,
    pub(crate) lower_bound: f64,
    pub(crate) tol: f64,
}

impl Default for RgtConfig {
    fn default() -> Self {
        Self {
            metric: SampleMetric::default(),
            radius: 1,
            max_iter: None,
            path_multiplier: 1.5,
            row_multiplier: 2.0,
            lower_bound: 1.0,
            tol: 1e-10,
        }
    }
}

impl RgtConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-sample metric used for alignment.
    #[must_use]
    pub fn with_metric(mut self, metric: SampleMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the FastDTW refinement radius.
    #[must_use]
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    /// Set the solver's outer iteration budget.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    /// Set the path-table sizing multiplier.
    #[must_use]
    pub fn with_path_multiplier(mut self, path_multiplier: f64) -> Self {
        self.path_multiplier = path_multiplier;
        self
    }

    /// Set the nonzero sizing multiplier.
    #[must_use]
    pub fn with_row_multiplier(mut self, row_multiplier: f64) -> Self {
        self.row_multiplier = row_multiplier;
        self
    }

    /// Set the minimum dRGT per sample.
    #[must_use]
    pub fn with_lower_bound(mut self, lower_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    /// Set the solver's relative cost-decrease tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Return the per-sample metric.
    #[must_use]
    pub fn metric(&self) -> &SampleMetric {
        &self.metric
    }

    /// Return the FastDTW radius.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Return the iteration budget the solver will use.
    #[must_use]
    pub fn effective_max_iter(&self) -> usize {
        self.max_iter.unwrap_or(DEFAULT_MAX_ITER)
    }

    /// Check every parameter without touching any log.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::InvalidMultiplier`] | A sizing multiplier is not positive and finite |
    /// | [`RgtError::InvalidLowerBound`] | `lower_bound` is not positive and finite |
    /// | [`RgtError::InvalidIterationBudget`] | `max_iter` is `Some(0)` |
    /// | [`RgtError::InvalidTolerance`] | `tol` is negative or not finite |
    pub fn validate(&self) -> Result<(), RgtError> {
        for (name, value) in [
            ("path_multiplier", self.path_multiplier),
            ("row_multiplier", self.row_multiplier),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(RgtError::InvalidMultiplier { name, value });
            }
        }
        self.solver().validate()
    }

    fn aligner(&self) -> PairAligner {
        PairAligner::new(
            Dtw::new(self.metric.clone()).with_radius(self.radius),
            self.path_multiplier,
        )
    }

    fn solver(&self) -> BoundedLeastSquares {
        BoundedLeastSquares::default()
            .with_lower_bound(self.lower_bound)
            .with_max_iter(self.effective_max_iter())
            .with_tol(self.tol)
    }

    /// Align every pair of logs without solving for RGT.
    ///
    /// # Errors
    ///
    /// Configuration errors as in [`RgtConfig::validate`], plus input and
    /// sizing errors from [`PairAligner::align`].
    pub fn distances(&self, logs: &[WellLog]) -> Result<PairwiseAlignment, RgtError> {
        self.validate()?;
        self.aligner().align(logs)
    }

    /// Estimate RGT for every log and attach it in place.
    ///
    /// Runs pairwise alignment, builds the consistency system, solves for
    /// dRGT with `dRGT ≥ lower_bound`, and stores the running sum of each
    /// log's dRGT as its RGT. Logs are only modified once every stage has
    /// succeeded.
    ///
    /// A solver that runs out of iterations does not fail the call; check
    /// [`RgtResult::converged`] or use [`RgtResult::require_converged`].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::InvalidMultiplier`] | A sizing multiplier is not positive and finite |
    /// | [`RgtError::InvalidLowerBound`] | `lower_bound` is not positive and finite |
    /// | [`RgtError::InvalidIterationBudget`] | `max_iter` is `Some(0)` |
    /// | [`RgtError::InvalidTolerance`] | `tol` is negative or not finite |
    /// | [`RgtError::TooFewLogs`] | Fewer than two logs |
    /// | [`RgtError::EmptyLog`] | A log has no samples |
    /// | [`RgtError::NoSharedChannels`] | Two logs share no channel |
    /// | [`RgtError::MissingValue`] | A shared channel has a missing sample |
    /// | [`RgtError::PathCapacityExceeded`] | A path outgrew the path table |
    /// | [`RgtError::NonzeroCapacityExceeded`] | The matrix outgrew its nonzero budget |
    #[instrument(skip(self, logs), fields(n_logs = logs.len(), radius = self.radius))]
    pub fn estimate(&self, logs: &mut [WellLog]) -> Result<RgtResult, RgtError> {
        self.validate()?;
        let PairwiseAlignment { distances, paths } = self.aligner().align(logs)?;

        let offsets = ColumnOffsets::from_logs(logs);
        let matrix = ConstraintBuilder::new(self.row_multiplier).build(&paths, &offsets)?;
        let solution = self.solver().solve(&matrix)?;

        assemble(logs, &offsets, &solution.x);
        info!(
            converged = solution.report.converged,
            iterations = solution.report.iterations,
            cost = solution.report.cost,
            "rgt estimated"
        );
        Ok(RgtResult::new(
            distances,
            paths,
            matrix.shape(),
            matrix.nnz(),
            solution.report,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RgtConfig::default();
        assert_eq!(config.radius(), 1);
        assert_eq!(config.effective_max_iter(), 100);
        assert!(matches!(config.metric(), SampleMetric::Norm(p) if *p == 0.125));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_max_iter_overrides_default() {
        assert_eq!(RgtConfig::new().with_max_iter(7).effective_max_iter(), 7);
    }

    #[test]
    fn validate_rejects_each_bad_parameter() {
        assert!(matches!(
            RgtConfig::new().with_path_multiplier(0.0).validate(),
            Err(RgtError::InvalidMultiplier { name: "path_multiplier", .. })
        ));
        assert!(matches!(
            RgtConfig::new().with_row_multiplier(f64::INFINITY).validate(),
            Err(RgtError::InvalidMultiplier { name: "row_multiplier", .. })
        ));
        for lb in [0.0, -1.0, f64::NEG_INFINITY] {
            assert!(
                matches!(
                    RgtConfig::new().with_lower_bound(lb).validate(),
                    Err(RgtError::InvalidLowerBound { .. })
                ),
                "lower bound {lb} accepted"
            );
        }
        assert!(matches!(
            RgtConfig::new().with_max_iter(0).validate(),
            Err(RgtError::InvalidIterationBudget)
        ));
        assert!(matches!(
            RgtConfig::new().with_tol(f64::NAN).validate(),
            Err(RgtError::InvalidTolerance { .. })
        ));
    }

    #[test]
    fn failed_estimate_leaves_logs_untouched() {
        let mut logs = vec![
            WellLog::indexed("A", 3).with_raw_channel("GR", &[1.0, 2.0, 3.0]).unwrap(),
            WellLog::indexed("B", 3).with_raw_channel("DT", &[1.0, 2.0, 3.0]).unwrap(),
        ];
        assert!(RgtConfig::new().estimate(&mut logs).is_err());
        assert!(logs.iter().all(|l| l.rgt().is_none()));
    }

    #[test]
    fn identical_logs_share_rgt() {
        let values = [0.0, 1.0, 3.0, 2.0, 5.0, 4.0];
        let mut logs = vec![
            WellLog::indexed("A", 6).with_raw_channel("GR", &values).unwrap(),
            WellLog::indexed("B", 6).with_raw_channel("GR", &values).unwrap(),
        ];
        let result = RgtConfig::new().estimate(&mut logs).unwrap();
        assert!(result.converged());
        assert_eq!(result.matrix_shape(), (6, 12));
        assert_eq!(logs[0].rgt(), Some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0][..]));
        assert_eq!(logs[0].rgt(), logs[1].rgt());
    }
}
