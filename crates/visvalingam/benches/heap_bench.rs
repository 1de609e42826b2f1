//! Criterion benchmarks for the indexed heap.
//! Focus sizes: n in {100, 1_000, 10_000}.
//! Results: by default under target/criterion; to store elsewhere, run with
//!   CARGO_TARGET_DIR=data/bench cargo bench -p visvalingam

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use visvalingam::heap::{HeapKey, IndexedHeap};

#[derive(Clone, Copy)]
struct Entry {
    id: usize,
    weight: f64,
}

impl HeapKey for Entry {
    type Key = usize;
    fn heap_key(&self) -> usize {
        self.id
    }
}

fn entries(n: usize, seed: u64) -> Vec<Entry> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|id| Entry {
            id,
            weight: rng.gen::<f64>(),
        })
        .collect()
}

fn filled_heap(es: &[Entry]) -> IndexedHeap<Entry, fn(&Entry, &Entry) -> bool> {
    let mut heap: IndexedHeap<Entry, fn(&Entry, &Entry) -> bool> =
        IndexedHeap::with_comparator(es.len(), |a, b| a.weight < b.weight);
    for e in es {
        heap.insert(*e);
    }
    heap
}

fn bench_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap");
    for &n in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("insert_pop", n), &n, |b, &n| {
            b.iter_batched(
                || entries(n, 43),
                |es| {
                    let mut heap = filled_heap(&es);
                    while heap.pop().is_some() {}
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("reheap", n), &n, |b, &n| {
            b.iter_batched(
                || {
                    let es = entries(n, 44);
                    let heap = filled_heap(&es);
                    let updates = entries(n, 45);
                    (heap, updates)
                },
                |(mut heap, updates)| {
                    for e in updates {
                        heap.reheap(e);
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_heap);
criterion_main!(benches);
