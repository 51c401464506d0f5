//! Criterion benchmarks for PriceCast hot paths.
//!
//! Benchmarks:
//! 1. Path simulation (diffusion only and with jumps) across ensemble sizes
//! 2. Outcome reduction over the terminal distribution
//! 3. Momentum snapshot over five years of closes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pricecast_core::charts::PercentileFan;
use pricecast_core::jump::JumpParameters;
use pricecast_core::momentum::MomentumSnapshot;
use pricecast_core::outcome::reduce_ensemble;
use pricecast_core::params::ModelParameters;
use pricecast_core::simulation::{simulate_paths, SimulationConfig};

fn config(path_count: usize) -> SimulationConfig {
    SimulationConfig {
        path_count,
        horizon_days: 504,
        ..SimulationConfig::default()
    }
}

fn bench_simulation(c: &mut Criterion) {
    let params = ModelParameters::unadjusted(0.08, 0.25);
    let jumps = JumpParameters {
        intensity: 4.0,
        mean_size: -0.03,
        size_volatility: 0.05,
    };

    let mut group = c.benchmark_group("simulate_paths");
    group.sample_size(10);
    for &paths in &[1_000usize, 10_000, 50_000] {
        let cfg = config(paths);
        group.bench_with_input(BenchmarkId::new("diffusion", paths), &cfg, |b, cfg| {
            b.iter(|| {
                simulate_paths(black_box(100.0), &params, &JumpParameters::none(), cfg, "").unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("jump_diffusion", paths), &cfg, |b, cfg| {
            b.iter(|| simulate_paths(black_box(100.0), &params, &jumps, cfg, "").unwrap())
        });
    }
    group.finish();
}

fn bench_reduction(c: &mut Criterion) {
    let cfg = config(50_000);
    let ens = simulate_paths(
        100.0,
        &ModelParameters::unadjusted(0.08, 0.25),
        &JumpParameters::none(),
        &cfg,
        "",
    )
    .unwrap();

    c.bench_function("reduce_ensemble_50k", |b| {
        b.iter(|| reduce_ensemble(black_box(&ens), 100.0, 10_000.0, 2.0).unwrap())
    });
    c.bench_function("percentile_fan_50k_stride5", |b| {
        b.iter(|| PercentileFan::from_ensemble(black_box(&ens), 5))
    });
}

fn bench_momentum(c: &mut Criterion) {
    let closes: Vec<f64> = (0..1260)
        .map(|i| 100.0 + (i as f64 * 0.05).sin() * 10.0 + i as f64 * 0.02)
        .collect();
    c.bench_function("momentum_snapshot_5y", |b| {
        b.iter(|| MomentumSnapshot::from_closes(black_box(&closes)))
    });
}

criterion_group!(benches, bench_simulation, bench_reduction, bench_momentum);
criterion_main!(benches);
