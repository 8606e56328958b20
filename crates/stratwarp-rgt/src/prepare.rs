//! Log preparation: robust normalization and missing-value filling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument, warn};

use crate::error::PrepareError;
use crate::log::WellLog;

/// Preparation toggles applied before alignment.
///
/// # Defaults
///
/// | Parameter      | Default |
/// |----------------|---------|
/// | `normalize`    | true    |
/// | `fill_missing` | true    |
/// | `seed`         | 42      |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareConfig {
    normalize: bool,
    fill_missing: bool,
    seed: u64,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            fill_missing: true,
            seed: 42,
        }
    }
}

impl PrepareConfig {
    /// Enable or disable median/IQR normalization.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Enable or disable filling of missing samples.
    #[must_use]
    pub fn with_fill_missing(mut self, fill_missing: bool) -> Self {
        self.fill_missing = fill_missing;
        self
    }

    /// Set the seed of the generator used to fill missing samples.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Apply the enabled steps in place: normalization first, then filling.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`PrepareError::ZeroSpread`] | Normalization met a channel with zero IQR |
    pub fn apply(&self, logs: &mut [WellLog]) -> Result<(), PrepareError> {
        if self.normalize {
            normalize(logs)?;
        }
        if self.fill_missing {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
            fill_missing(logs, &mut rng);
        }
        Ok(())
    }
}

/// Shift and scale every channel of every log to zero median and unit
/// interquartile range, computed over observed samples only.
///
/// Channels without any observation are left untouched.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`PrepareError::ZeroSpread`] | A channel's 25th and 75th percentiles coincide |
#[instrument(skip(logs), fields(n_logs = logs.len()))]
pub fn normalize(logs: &mut [WellLog]) -> Result<(), PrepareError> {
    for (log_index, log) in logs.iter_mut().enumerate() {
        let log_name = log.name().to_string();
        for channel in log.channels_mut() {
            let mut observed: Vec<f64> = channel.observed().collect();
            if observed.is_empty() {
                warn!(
                    log = %log_name,
                    channel = channel.name(),
                    "channel has no observations, left unnormalized"
                );
                continue;
            }
            observed.sort_unstable_by(f64::total_cmp);
            let q1 = percentile_sorted(&observed, 25.0);
            let median = percentile_sorted(&observed, 50.0);
            let q3 = percentile_sorted(&observed, 75.0);
            let iqr = q3 - q1;
            if iqr == 0.0 {
                return Err(PrepareError::ZeroSpread {
                    log: log_index,
                    channel: channel.name().to_string(),
                });
            }
            for value in channel.values_mut().iter_mut().flatten() {
                *value = (*value - median) / iqr;
            }
            debug!(log = %log_name, channel = channel.name(), median, iqr, "channel normalized");
        }
    }
    info!("logs normalized");
    Ok(())
}

/// Replace every missing sample with a draw from U[-1, 1), which has median 0
/// and interquartile range 1, matching normalized channels.
#[instrument(skip(logs, rng), fields(n_logs = logs.len()))]
pub fn fill_missing<R: Rng>(logs: &mut [WellLog], rng: &mut R) {
    let mut n_filled = 0usize;
    for log in logs.iter_mut() {
        for channel in log.channels_mut() {
            for value in channel.values_mut() {
                if value.is_none() {
                    *value = Some((rng.r#gen::<f64>() - 0.5) * 2.0);
                    n_filled += 1;
                }
            }
        }
    }
    info!(n_filled, "missing samples filled");
}

/// Percentile of an ascending slice, interpolating linearly between the two
/// nearest order statistics.
pub(crate) fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quartiles(log: &WellLog, channel: &str) -> (f64, f64, f64) {
        let mut v: Vec<f64> = log.channel(channel).unwrap().observed().collect();
        v.sort_unstable_by(f64::total_cmp);
        (
            percentile_sorted(&v, 25.0),
            percentile_sorted(&v, 50.0),
            percentile_sorted(&v, 75.0),
        )
    }

    #[test]
    fn percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile_sorted(&v, 0.0), 1.0);
        assert_eq!(percentile_sorted(&v, 100.0), 4.0);
        assert!((percentile_sorted(&v, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile_sorted(&v, 25.0) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn normalize_gives_zero_median_unit_iqr() {
        let mut logs = vec![
            WellLog::indexed("A", 6)
                .with_raw_channel("GR", &[10.0, f64::NAN, 30.0, 45.0, 70.0, 20.0])
                .unwrap(),
        ];
        normalize(&mut logs).unwrap();
        let (q1, median, q3) = quartiles(&logs[0], "GR");
        assert!(median.abs() < 1e-12, "median {median}");
        assert!((q3 - q1 - 1.0).abs() < 1e-12, "iqr {}", q3 - q1);
        assert_eq!(logs[0].channel("GR").unwrap().n_missing(), 1);
    }

    #[test]
    fn zero_spread_is_rejected() {
        let mut logs = vec![
            WellLog::indexed("A", 4)
                .with_raw_channel("GR", &[5.0, 5.0, 5.0, 5.0])
                .unwrap(),
        ];
        assert!(matches!(
            normalize(&mut logs),
            Err(PrepareError::ZeroSpread { log: 0, .. })
        ));
    }

    #[test]
    fn unobserved_channel_is_skipped() {
        let mut logs = vec![
            WellLog::indexed("A", 2)
                .with_raw_channel("GR", &[f64::NAN, f64::NAN])
                .unwrap(),
        ];
        normalize(&mut logs).unwrap();
        assert_eq!(logs[0].channel("GR").unwrap().n_missing(), 2);
    }

    #[test]
    fn fill_missing_replaces_only_gaps_within_unit_band() {
        let mut logs = vec![
            WellLog::indexed("A", 5)
                .with_raw_channel("GR", &[7.0, f64::NAN, f64::NAN, 9.0, f64::NAN])
                .unwrap(),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        fill_missing(&mut logs, &mut rng);
        let values = logs[0].channel("GR").unwrap().values();
        assert_eq!(values[0], Some(7.0));
        assert_eq!(values[3], Some(9.0));
        for v in [values[1], values[2], values[4]] {
            let v = v.unwrap();
            assert!((-1.0..1.0).contains(&v), "filled value {v} outside [-1, 1)");
        }
    }

    #[test]
    fn fill_missing_is_reproducible_for_a_seed() {
        let make = || {
            vec![
                WellLog::indexed("A", 3)
                    .with_raw_channel("GR", &[f64::NAN, 1.0, f64::NAN])
                    .unwrap(),
            ]
        };
        let (mut a, mut b) = (make(), make());
        let config = PrepareConfig::default().with_normalize(false).with_seed(11);
        config.apply(&mut a).unwrap();
        config.apply(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn filled_values_have_roughly_unit_iqr() {
        let mut logs = vec![
            WellLog::indexed("A", 4001)
                .with_raw_channel("GR", &vec![f64::NAN; 4001])
                .unwrap(),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        fill_missing(&mut logs, &mut rng);
        let (q1, median, q3) = quartiles(&logs[0], "GR");
        assert!(median.abs() < 0.1, "median {median}");
        assert!((q3 - q1 - 1.0).abs() < 0.1, "iqr {}", q3 - q1);
    }
}
