//! Benchmarks for sweep-mode matching.
//!
//! Run with: `cargo bench --bench sweep`
//!
//! Compares index-pruned sweeps with full column scans and measures batch
//! throughput on synthetic corridors.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tracebundle::synthetic::{CorridorDataset, CorridorScenario};
use tracebundle::{ConcatenatedCurve, MatchConfig, SweepMatcher, collect_events_batch};

fn dataset(track_count: usize) -> CorridorDataset {
    CorridorScenario {
        track_count,
        corridor_length: 2_000.0,
        ..CorridorScenario::default()
    }
    .generate()
}

/// Benchmark one corridor sweep, pruned and unpruned.
fn bench_single_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_sweep");
    group.sample_size(10);

    for tracks in [10, 40].iter() {
        let data = dataset(*tracks);
        let candidates =
            Arc::new(ConcatenatedCurve::new(data.tracks.clone()).expect("valid tracks"));

        for use_index in [true, false] {
            let config = MatchConfig {
                use_index,
                ..MatchConfig::with_epsilon(15.0)
            };
            let label = if use_index { "rtree" } else { "full_scan" };
            group.bench_with_input(BenchmarkId::new(label, tracks), &config, |b, cfg| {
                b.iter(|| {
                    let mut matcher = SweepMatcher::new(
                        data.corridor.clone(),
                        Arc::clone(&candidates),
                        black_box(cfg),
                    )
                    .unwrap();
                    matcher.compute();
                    matcher.collect_events().len()
                })
            });
        }
    }

    group.finish();
}

/// Benchmark sweeping every track against all tracks.
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_sweep");
    group.sample_size(10);

    for tracks in [10, 20].iter() {
        let data = dataset(*tracks);
        let candidates =
            Arc::new(ConcatenatedCurve::new(data.tracks.clone()).expect("valid tracks"));
        let config = MatchConfig::with_epsilon(15.0);

        group.bench_with_input(BenchmarkId::new("tracks", tracks), &data.tracks, |b, reps| {
            b.iter(|| collect_events_batch(black_box(reps), Arc::clone(&candidates), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_sweep, bench_batch);
criterion_main!(benches);
