use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ordered_collections::{DefaultOrderedMap, OrderedMap, OrderedSet, Slice};
use std::collections::{HashMap, HashSet};
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_set_insert(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("set_insert_random");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter(|| {
            let mut set = OrderedSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("HashSet", N), |b| {
        b.iter(|| {
            let mut set = HashSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

fn bench_set_bounded_insert(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("set_insert_bounded");

    for max_len in [16, 256, 4096] {
        group.bench_function(BenchmarkId::new("OrderedSet", max_len), |b| {
            b.iter(|| {
                let mut set = OrderedSet::with_max_len(max_len).unwrap();
                for &k in &keys {
                    set.insert(k);
                }
                set
            });
        });
    }

    group.finish();
}

fn bench_set_contains(c: &mut Criterion) {
    let keys = random_keys(N);
    let set: OrderedSet<i64> = keys.iter().copied().collect();
    let hash_set: HashSet<i64> = keys.iter().copied().collect();
    let mut group = c.benchmark_group("set_contains");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter(|| keys.iter().filter(|k| set.contains(*k)).count());
    });

    group.bench_function(BenchmarkId::new("HashSet", N), |b| {
        b.iter(|| keys.iter().filter(|k| hash_set.contains(*k)).count());
    });

    group.finish();
}

fn bench_set_discard_readd(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("set_discard_readd");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        let mut set: OrderedSet<i64> = keys.iter().copied().collect();
        b.iter(|| {
            for k in keys.iter().step_by(7) {
                set.discard(k);
                set.insert(*k);
            }
        });
    });

    group.finish();
}

fn bench_set_algebra(c: &mut Criterion) {
    let a: OrderedSet<i64> = random_keys(N).into_iter().map(|k| k % 20_000).collect();
    let b_set: OrderedSet<i64> = random_keys(2 * N).into_iter().skip(N).map(|k| k % 20_000).collect();
    let mut group = c.benchmark_group("set_algebra");

    group.bench_function("union", |b| b.iter(|| &a | &b_set));
    group.bench_function("intersection", |b| b.iter(|| &a & &b_set));
    group.bench_function("difference", |b| b.iter(|| &a - &b_set));
    group.bench_function("symmetric_difference", |b| b.iter(|| &a ^ &b_set));

    group.finish();
}

fn bench_set_iter(c: &mut Criterion) {
    let set: OrderedSet<i64> = random_keys(N).into_iter().collect();
    let mut group = c.benchmark_group("set_iter");

    group.bench_function("forward", |b| b.iter(|| set.iter().copied().sum::<i64>()));
    group.bench_function("reverse", |b| b.iter(|| set.iter().rev().copied().sum::<i64>()));

    group.finish();
}

fn bench_set_select(c: &mut Criterion) {
    let set: OrderedSet<i64> = random_keys(N).into_iter().collect();
    let mut group = c.benchmark_group("set_select");

    group.bench_function("at_middle", |b| b.iter(|| set.at(black_box(5_000)).copied()));
    group.bench_function("slice_step_3", |b| {
        b.iter(|| set.slice(Slice::new(None, None, Some(3))).map(|s| s.len()));
    });

    group.finish();
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_insert_random");

    group.bench_function(BenchmarkId::new("OrderedMap", N), |b| {
        b.iter(|| {
            let mut map = OrderedMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("HashMap", N), |b| {
        b.iter(|| {
            let mut map = HashMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_pop_first(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_pop_first");

    group.bench_function(BenchmarkId::new("OrderedMap", N), |b| {
        b.iter(|| {
            let mut map: OrderedMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
            while map.pop_first().is_some() {}
            map
        });
    });

    group.finish();
}

fn bench_counter(c: &mut Criterion) {
    let keys: Vec<i64> = random_keys(N).into_iter().map(|k| k % 512).collect();
    let mut group = c.benchmark_group("counter");

    group.bench_function(BenchmarkId::new("DefaultOrderedMap", N), |b| {
        b.iter(|| {
            let mut counts = DefaultOrderedMap::with_factory(|| 0u32);
            for &k in &keys {
                if let Ok(count) = counts.get_or_default(k) {
                    *count += 1;
                }
            }
            counts
        });
    });

    group.bench_function(BenchmarkId::new("HashMap", N), |b| {
        b.iter(|| {
            let mut counts = HashMap::new();
            for &k in &keys {
                *counts.entry(k).or_insert(0u32) += 1;
            }
            counts
        });
    });

    group.finish();
}

criterion_group!(
    set_benches,
    bench_set_insert,
    bench_set_bounded_insert,
    bench_set_contains,
    bench_set_discard_readd,
    bench_set_algebra,
    bench_set_iter,
    bench_set_select,
);

criterion_group!(map_benches, bench_map_insert, bench_map_pop_first, bench_counter);

criterion_main!(set_benches, map_benches);
