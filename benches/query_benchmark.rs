//! Benchmarks for cidrbucket build and query performance.
//!
//! Run with: cargo bench
//!
//! This benchmark suite measures:
//! - Query throughput for hits and misses
//! - Cost of wide (multi-bucket) ranges
//! - Build time at different list sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cidrbucket::{Range, RangeIndex};

/// Deterministic pseudo-random CIDRs, skewed towards /16../24 like real lists.
fn generate_ranges(count: usize) -> Vec<Range> {
    let mut state = 0x2545_F491_u32;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let prefix_len = 16 + (state % 9) as u8;
            Range::from_prefix(state, prefix_len).unwrap()
        })
        .collect()
}

/// Query addresses: the first `hit_ratio` share are range starts, the rest
/// step through the address space.
fn generate_queries(ranges: &[Range], count: usize, hit_ratio: f64) -> Vec<u32> {
    let hits = (count as f64 * hit_ratio) as usize;
    let mut queries: Vec<u32> = ranges.iter().cycle().take(hits).map(|r| r.start()).collect();
    queries.extend((hits..count).map(|i| (i as u32).wrapping_mul(0x9E37_79B9)));
    queries
}

/// Benchmark mixed hit/miss queries against a 100k-range index.
fn bench_query_mixed(c: &mut Criterion) {
    let ranges = generate_ranges(100_000);
    let index = RangeIndex::build(ranges.clone());
    let queries = generate_queries(&ranges, 1000, 0.5);

    let mut group = c.benchmark_group("query_mixed");
    group.throughput(Throughput::Elements(queries.len() as u64));

    group.bench_function("100k_ranges", |b| {
        b.iter(|| {
            for addr in &queries {
                black_box(index.contains(*addr));
            }
        })
    });

    group.finish();
}

/// Benchmark the empty-bucket fast path.
fn bench_query_empty_bucket(c: &mut Criterion) {
    let index = RangeIndex::build(
        (0u32..128).map(|i| Range::from_prefix(i << 24, 8).unwrap()),
    );

    let mut group = c.benchmark_group("query_empty_bucket");
    group.bench_function("miss", |b| b.iter(|| black_box(index.contains(0xC800_0001))));
    group.bench_function("hit", |b| b.iter(|| black_box(index.contains(0x0A00_0001))));
    group.finish();
}

/// Benchmark queries where short prefixes are replicated into many buckets.
fn bench_query_wide_ranges(c: &mut Criterion) {
    let mut ranges = generate_ranges(50_000);
    ranges.extend((0u32..32).map(|i| Range::from_prefix(i << 27, 5).unwrap()));
    let index = RangeIndex::build(ranges.clone());
    let queries = generate_queries(&ranges, 1000, 0.0);

    let mut group = c.benchmark_group("query_wide_ranges");
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("50k_plus_slash5", |b| {
        b.iter(|| {
            for addr in &queries {
                black_box(index.contains(*addr));
            }
        })
    });
    group.finish();
}

/// Benchmark build time at different list sizes.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [1_000, 10_000, 100_000].iter() {
        let ranges = generate_ranges(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("ranges", size), size, |b, _| {
            b.iter_batched(
                || ranges.clone(),
                |ranges| black_box(RangeIndex::build(ranges)),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

/// Benchmark index footprint estimation.
fn bench_memory_usage(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_estimation");

    for size in [10_000, 100_000].iter() {
        let index = RangeIndex::build(generate_ranges(*size));
        let bytes = index.entry_count() * std::mem::size_of::<Range>();

        group.bench_with_input(BenchmarkId::new("entries", size), size, |b, _| {
            b.iter(|| black_box(index.entry_count()))
        });

        println!(
            "Index with {} ranges: {} entries, {} bytes ({:.2} MB)",
            size,
            index.entry_count(),
            bytes,
            bytes as f64 / 1024.0 / 1024.0
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_query_mixed,
    bench_query_empty_bucket,
    bench_query_wide_ranges,
    bench_build,
    bench_memory_usage,
);

criterion_main!(benches);
