//! Benchmarks for the gamma placement engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gamma_pack_core::{Detail, GammaAlgorithm, GammaConfig};

fn run(n0: u64, count: u64, track_placed: bool) -> usize {
    let config = GammaConfig::new()
        .with_gamma(25.0 / 17.0)
        .with_n0(n0)
        .with_tracking(track_placed);
    let side = (1.0 / n0 as f64).sqrt();
    let mut engine = GammaAlgorithm::new(config);
    let mut placed = vec![Detail::sheet((0.0, 0.0), side, side)];
    for i in n0..n0 + count {
        let size = (1.0 / i as f64, 1.0 / (i + 1) as f64);
        if engine.place_next(size, &mut placed).is_err() {
            break;
        }
    }
    placed.len() + engine.pool().len()
}

fn engine_benchmark(c: &mut Criterion) {
    c.bench_function("place_1000_harmonic_untracked", |b| {
        b.iter(|| black_box(run(black_box(100), 1000, false)))
    });

    c.bench_function("place_1000_harmonic_tracked", |b| {
        b.iter(|| black_box(run(black_box(100), 1000, true)))
    });
}

criterion_group!(benches, engine_benchmark);
criterion_main!(benches);
