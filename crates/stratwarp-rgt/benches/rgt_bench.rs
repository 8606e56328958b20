//! Criterion benchmarks for stratwarp-rgt: pairwise alignment and full estimation.

use criterion::{Criterion, criterion_group, criterion_main};

use stratwarp_rgt::{RgtConfig, WellLog};

/// Six logs of a shared two-channel signal with increasing top offsets.
fn make_logs(n_samples: usize) -> Vec<WellLog> {
    (0..6)
        .map(|k| {
            let shift = k as f64 * 3.0;
            let gr: Vec<f64> = (0..n_samples)
                .map(|i| ((i as f64 + shift) * 0.15).sin())
                .collect();
            let dt: Vec<f64> = (0..n_samples)
                .map(|i| ((i as f64 + shift) * 0.05).cos())
                .collect();
            WellLog::indexed(format!("W{k}"), n_samples)
                .with_raw_channel("GR", &gr)
                .unwrap()
                .with_raw_channel("DT", &dt)
                .unwrap()
        })
        .collect()
}

fn bench_distances(c: &mut Criterion) {
    let logs = make_logs(200);
    let config = RgtConfig::new();
    c.bench_function("distances_6x200", |b| {
        b.iter(|| config.distances(&logs).unwrap());
    });
}

fn bench_estimate(c: &mut Criterion) {
    let logs = make_logs(100);
    let config = RgtConfig::new().with_path_multiplier(2.0);
    c.bench_function("estimate_6x100", |b| {
        b.iter(|| {
            let mut logs = logs.clone();
            config.estimate(&mut logs).unwrap()
        });
    });
}

criterion_group!(benches, bench_distances, bench_estimate);
criterion_main!(benches);
