//! Criterion benchmarks for the elimination engine.
//! Construction dominates (the full pop/relink/reheap loop); queries are
//! linear filters and benched once for scale.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use visvalingam::prelude::*;

fn walk(n: usize) -> Linestring {
    let cfg = WalkCfg {
        len: n,
        ..WalkCfg::default()
    };
    draw_polyline_walk(cfg, ReplayToken { seed: 43, index: 0 })
}

fn bench_simplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify");
    for &n in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("construct", n), &n, |b, &n| {
            b.iter_batched(
                || walk(n),
                |line| {
                    let _engine = Visvalingam::new(&line);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("query", n), &n, |b, &n| {
            let line = walk(n);
            let engine = Visvalingam::new(&line);
            let threshold = engine.area_threshold_for_ratio(50);
            b.iter(|| engine.simplify_indexed(threshold))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simplify);
criterion_main!(benches);
