//! Turn the solved dRGT vector into per-log RGT curves.

use tracing::{debug, instrument};

use crate::log::WellLog;
use crate::offsets::ColumnOffsets;

/// Split `drgt` by `offsets`, take the running sum of each log's segment and
/// attach it as that log's RGT, replacing any previous value.
///
/// # Panics
///
/// Panics if `offsets` does not describe `logs` and `drgt`.
#[instrument(skip_all, fields(n_logs = logs.len()))]
pub fn assemble(logs: &mut [WellLog], offsets: &ColumnOffsets, drgt: &[f64]) {
    assert_eq!(offsets.n_logs(), logs.len(), "offsets must cover every log");
    assert_eq!(offsets.total(), drgt.len(), "dRGT length must match the column count");
    for (m, log) in logs.iter_mut().enumerate() {
        let rgt: Vec<f64> = drgt[offsets.range(m)]
            .iter()
            .scan(0.0, |acc, &d| {
                *acc += d;
                Some(*acc)
            })
            .collect();
        debug!(log = log.name(), top = ?rgt.first(), base = ?rgt.last(), "rgt attached");
        log.set_rgt(rgt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_sum_per_log() {
        let mut logs = vec![WellLog::indexed("A", 3), WellLog::indexed("B", 2)];
        let offsets = ColumnOffsets::from_logs(&logs);
        assemble(&mut logs, &offsets, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(logs[0].rgt(), Some(&[1.0, 3.0, 6.0][..]));
        assert_eq!(logs[1].rgt(), Some(&[4.0, 9.0][..]));
    }

    #[test]
    fn overwrites_previous_rgt() {
        let mut logs = vec![WellLog::indexed("A", 2), WellLog::indexed("B", 1)];
        let offsets = ColumnOffsets::from_logs(&logs);
        assemble(&mut logs, &offsets, &[1.0, 1.0, 1.0]);
        assemble(&mut logs, &offsets, &[2.0, 2.0, 5.0]);
        assert_eq!(logs[0].rgt(), Some(&[2.0, 4.0][..]));
        assert_eq!(logs[1].rgt(), Some(&[5.0][..]));
    }

    #[test]
    #[should_panic(expected = "dRGT length")]
    fn length_mismatch_panics() {
        let mut logs = vec![WellLog::indexed("A", 2)];
        let offsets = ColumnOffsets::from_logs(&logs);
        assemble(&mut logs, &offsets, &[1.0]);
    }
}
