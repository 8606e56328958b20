//! End-to-end consistency tests for stratwarp-rgt.
//!
//! These tests pin down the properties an RGT estimate must have on small
//! hand-built logs: monotone curves, agreement between logs at aligned
//! samples, tolerance of gaps once filled, and typed sizing failures.

use stratwarp_rgt::{PrepareConfig, RgtConfig, RgtError, WellLog, normalize};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const A: [f64; 8] = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0];
const B: [f64; 8] = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
const C: [f64; 8] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];

/// Three ramps whose onsets sit at samples 4, 2 and 0, so that A[5], B[3]
/// and C[1] all read 1.0 and belong to the same horizon.
fn shifted_ramps() -> Vec<WellLog> {
    vec![
        WellLog::indexed("A", 8).with_raw_channel("GR", &A).unwrap(),
        WellLog::indexed("B", 8).with_raw_channel("GR", &B).unwrap(),
        WellLog::indexed("C", 8).with_raw_channel("GR", &C).unwrap(),
    ]
}

/// The same ramps plus a second channel that is missing above each log's
/// ramp onset.
fn shifted_ramps_with_gaps() -> Vec<WellLog> {
    let nan = f64::NAN;
    let a2 = [nan, nan, nan, -1.0, 0.0, 1.0, 2.0, 3.0];
    let b2 = [nan, nan, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let c2 = [nan, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    shifted_ramps()
        .into_iter()
        .zip([a2, b2, c2])
        .map(|(log, second)| log.with_raw_channel("DT", &second).unwrap())
        .collect()
}

fn rgt(log: &WellLog) -> &[f64] {
    log.rgt().expect("rgt attached")
}

fn assert_close(a: f64, b: f64, what: &str) {
    let scale = a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= 1e-6 * scale, "{what}: {a} vs {b}");
}

// ---------------------------------------------------------------------------
// a) monotonicity
// ---------------------------------------------------------------------------

/// With dRGT ≥ 1 every RGT curve rises by at least one per sample.
#[test]
fn rgt_is_strictly_increasing() {
    let mut logs = shifted_ramps();
    let result = RgtConfig::new().estimate(&mut logs).unwrap();
    assert!(result.converged());
    for log in &logs {
        let curve = rgt(log);
        assert_eq!(curve.len(), log.len());
        assert!(curve[0] >= 1.0 - 1e-12);
        for w in curve.windows(2) {
            assert!(w[1] - w[0] >= 1.0 - 1e-9, "{}: {:?}", log.name(), curve);
        }
    }
}

// ---------------------------------------------------------------------------
// b) cross-log consistency
// ---------------------------------------------------------------------------

/// Samples on the same horizon receive the same RGT in every log.
#[test]
fn shifted_ramps_agree_on_shared_horizon() {
    let mut logs = shifted_ramps();
    RgtConfig::new().estimate(&mut logs).unwrap();
    let (a5, b3, c1) = (rgt(&logs[0])[5], rgt(&logs[1])[3], rgt(&logs[2])[1]);
    assert_close(a5, b3, "A[5] vs B[3]");
    assert_close(b3, c1, "B[3] vs C[1]");
}

#[test]
fn estimate_reports_system_shape() {
    let mut logs = shifted_ramps();
    let result = RgtConfig::new().estimate(&mut logs).unwrap();
    let (rows, cols) = result.matrix_shape();
    assert_eq!(cols, 24);
    assert_eq!(rows, result.paths().total_steps());
    assert!(result.nnz() >= 2 * rows);
    assert_eq!(result.distances().len(), 3);
}

// ---------------------------------------------------------------------------
// c) missing data
// ---------------------------------------------------------------------------

/// Gaps filled with random values do not break the alignment of the
/// well-observed horizon.
#[test]
fn filled_gaps_keep_horizon_consistent() {
    for seed in [42, 7] {
        let mut logs = shifted_ramps_with_gaps();
        PrepareConfig::default()
            .with_normalize(false)
            .with_seed(seed)
            .apply(&mut logs)
            .unwrap();
        assert!(logs.iter().all(|l| l.channels().iter().all(|c| c.n_missing() == 0)));

        RgtConfig::new().estimate(&mut logs).unwrap();
        let (a5, b3, c1) = (rgt(&logs[0])[5], rgt(&logs[1])[3], rgt(&logs[2])[1]);
        assert_close(a5, b3, "A[5] vs B[3]");
        assert_close(b3, c1, "B[3] vs C[1]");
    }
}

#[test]
fn unfilled_gaps_are_reported() {
    let mut logs = shifted_ramps_with_gaps();
    let err = RgtConfig::new().estimate(&mut logs).unwrap_err();
    assert!(matches!(err, RgtError::MissingValue { log: 0, sample: 0, .. }));
}

// ---------------------------------------------------------------------------
// d) sizing
// ---------------------------------------------------------------------------

/// A path table sized to exactly the longest log cannot hold warped paths.
#[test]
fn unit_path_multiplier_fails_without_truncating() {
    let mut logs = shifted_ramps();
    let err = RgtConfig::new()
        .with_path_multiplier(1.0)
        .estimate(&mut logs)
        .unwrap_err();
    match err {
        RgtError::PathCapacityExceeded { len, capacity, .. } => {
            assert_eq!(capacity, 8);
            assert!(len > capacity);
        }
        other => panic!("expected PathCapacityExceeded, got {other:?}"),
    }
    assert!(logs.iter().all(|l| l.rgt().is_none()));
}

#[test]
fn tight_row_multiplier_fails() {
    let mut logs = shifted_ramps();
    let err = RgtConfig::new()
        .with_row_multiplier(0.25)
        .estimate(&mut logs)
        .unwrap_err();
    assert!(matches!(err, RgtError::NonzeroCapacityExceeded { .. }));
}

// ---------------------------------------------------------------------------
// e) convergence
// ---------------------------------------------------------------------------

#[test]
fn exhausted_budget_is_soft_until_required() {
    let mut logs = shifted_ramps();
    let result = RgtConfig::new()
        .with_max_iter(1)
        .estimate(&mut logs)
        .unwrap();
    assert!(!result.converged());
    assert_eq!(result.report().iterations, 1);
    assert!(logs.iter().all(|l| l.rgt().is_some()));
    assert!(matches!(
        result.require_converged(),
        Err(RgtError::NotConverged { iterations: 1, .. })
    ));
}

#[test]
fn reestimation_overwrites_rgt() {
    let mut logs = shifted_ramps();
    RgtConfig::new().estimate(&mut logs).unwrap();
    let first: Vec<f64> = rgt(&logs[0]).to_vec();
    RgtConfig::new().with_lower_bound(2.0).estimate(&mut logs).unwrap();
    let second = rgt(&logs[0]);
    assert!(second[0] >= 2.0 - 1e-12);
    assert_ne!(first.as_slice(), second);
}

#[test]
fn zero_lower_bound_is_rejected_before_alignment() {
    let mut logs = shifted_ramps();
    let before = logs.clone();
    assert!(matches!(
        RgtConfig::new().with_lower_bound(0.0).estimate(&mut logs),
        Err(RgtError::InvalidLowerBound { value }) if value == 0.0
    ));
    assert_eq!(logs, before);
}

// ---------------------------------------------------------------------------
// f) preparation
// ---------------------------------------------------------------------------

#[test]
fn normalization_is_idempotent() {
    let mut logs = shifted_ramps_with_gaps();
    normalize(&mut logs).unwrap();
    let once = logs.clone();
    normalize(&mut logs).unwrap();
    for (a, b) in once.iter().zip(&logs) {
        for (ca, cb) in a.channels().iter().zip(b.channels()) {
            for (va, vb) in ca.values().iter().zip(cb.values()) {
                match (va, vb) {
                    (Some(x), Some(y)) => assert!((x - y).abs() < 1e-12),
                    (None, None) => {}
                    _ => panic!("missing mask changed"),
                }
            }
        }
    }
}

#[test]
fn distances_only_leaves_logs_untouched() {
    let logs = shifted_ramps();
    let alignment = RgtConfig::new().distances(&logs).unwrap();
    assert_eq!(alignment.distances.len(), 3);
    assert!(alignment.distances.get(0, 2) > 0.0);
    assert!(logs.iter().all(|l| l.rgt().is_none()));
}
