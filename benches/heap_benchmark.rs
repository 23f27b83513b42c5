//! Heap operation benchmarks
//!
//! Compares the heaps on the workloads their bounds are about: bulk
//! insert then drain, decrease_key heavy mixes, and merging many small heaps.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench heap_benchmark
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mergeable_heaps::fibonacci::FibonacciHeap;
use mergeable_heaps::leftist::LeftistHeap;
use mergeable_heaps::pairing::PairingHeap;
use mergeable_heaps::skew::SkewHeap;
use mergeable_heaps::{DecreaseKeyHeap, Heap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn random_priorities(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..u64::MAX / 2)).collect()
}

fn insert_drain<H: Heap<(), u64>>(priorities: &[u64]) -> u64 {
    let mut heap = H::new();
    for &p in priorities {
        heap.push(p, ());
    }
    let mut checksum = 0u64;
    while let Some((p, ())) = heap.pop() {
        checksum = checksum.wrapping_add(p);
    }
    checksum
}

fn insert_drain_std(priorities: &[u64]) -> u64 {
    let mut heap: BinaryHeap<Reverse<u64>> = priorities.iter().copied().map(Reverse).collect();
    let mut checksum = 0u64;
    while let Some(Reverse(p)) = heap.pop() {
        checksum = checksum.wrapping_add(p);
    }
    checksum
}

/// Insert everything, pop once to build trees, then lower every key once
/// and drain.
fn decrease_key_mix<H: DecreaseKeyHeap<usize, u64>>(priorities: &[u64]) -> u64 {
    let mut heap = H::new();
    let handles: Vec<_> = priorities
        .iter()
        .enumerate()
        .map(|(i, &p)| heap.push_with_handle(p + u64::MAX / 2, i))
        .collect();
    heap.push(0, usize::MAX);
    heap.pop();

    for (handle, &p) in handles.iter().zip(priorities) {
        let _ = heap.decrease_key(handle, p);
    }
    let mut checksum = 0u64;
    while let Some((p, _)) = heap.pop() {
        checksum = checksum.wrapping_add(p);
    }
    checksum
}

fn merge_many<H: Heap<(), u64>>(priorities: &[u64]) -> usize {
    let mut acc = H::new();
    for chunk in priorities.chunks(16) {
        let mut small = H::new();
        for &p in chunk {
            small.push(p, ());
        }
        acc.merge(small);
    }
    acc.len()
}

fn bench_insert_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_drain");
    for &n in &SIZES {
        let priorities = random_priorities(n, n as u64);
        group.bench_with_input(BenchmarkId::new("fibonacci", n), &priorities, |b, ps| {
            b.iter(|| black_box(insert_drain::<FibonacciHeap<(), u64>>(ps)))
        });
        group.bench_with_input(BenchmarkId::new("pairing", n), &priorities, |b, ps| {
            b.iter(|| black_box(insert_drain::<PairingHeap<(), u64>>(ps)))
        });
        group.bench_with_input(BenchmarkId::new("leftist", n), &priorities, |b, ps| {
            b.iter(|| black_box(insert_drain::<LeftistHeap<(), u64>>(ps)))
        });
        group.bench_with_input(BenchmarkId::new("skew", n), &priorities, |b, ps| {
            b.iter(|| black_box(insert_drain::<SkewHeap<(), u64>>(ps)))
        });
        group.bench_with_input(BenchmarkId::new("std_binary", n), &priorities, |b, ps| {
            b.iter(|| black_box(insert_drain_std(ps)))
        });
    }
    group.finish();
}

fn bench_decrease_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrease_key");
    for &n in &SIZES {
        let priorities = random_priorities(n, 7 * n as u64);
        group.bench_with_input(BenchmarkId::new("fibonacci", n), &priorities, |b, ps| {
            b.iter(|| black_box(decrease_key_mix::<FibonacciHeap<usize, u64>>(ps)))
        });
        group.bench_with_input(BenchmarkId::new("pairing", n), &priorities, |b, ps| {
            b.iter(|| black_box(decrease_key_mix::<PairingHeap<usize, u64>>(ps)))
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for &n in &SIZES {
        let priorities = random_priorities(n, 3 * n as u64);
        group.bench_with_input(BenchmarkId::new("fibonacci", n), &priorities, |b, ps| {
            b.iter(|| black_box(merge_many::<FibonacciHeap<(), u64>>(ps)))
        });
        group.bench_with_input(BenchmarkId::new("pairing", n), &priorities, |b, ps| {
            b.iter(|| black_box(merge_many::<PairingHeap<(), u64>>(ps)))
        });
        group.bench_with_input(BenchmarkId::new("leftist", n), &priorities, |b, ps| {
            b.iter(|| black_box(merge_many::<LeftistHeap<(), u64>>(ps)))
        });
        group.bench_with_input(BenchmarkId::new("skew", n), &priorities, |b, ps| {
            b.iter(|| black_box(merge_many::<SkewHeap<(), u64>>(ps)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert_drain, bench_decrease_key, bench_merge);
criterion_main!(benches);
