//! Criterion benchmarks for the median filter engine.
//!
//! Run with: cargo bench -p medfilt_core
//! Run specific: cargo bench -p medfilt_core -- filter_run

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array2;
use rand::prelude::*;

use medfilt_core::{median_filter, partition_rows, window_median, FilterConfig, WindowSpec};

fn random_matrix(rows: usize, cols: usize, seed: u64) -> Array2<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-1000..1000))
}

// =============================================================================
// Kernel Benchmarks
// =============================================================================

fn bench_window_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_median");
    let matrix = random_matrix(256, 256, 42);

    for size in [3, 5, 9, 15, 25] {
        let window = WindowSpec::new(size).unwrap();
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("interior", size), &size, |b, _| {
            b.iter(|| window_median(black_box(matrix.view()), 128, 128, window))
        });
        group.bench_with_input(BenchmarkId::new("corner_clipped", size), &size, |b, _| {
            b.iter(|| window_median(black_box(matrix.view()), 0, 0, window))
        });
    }
    group.finish();
}

// =============================================================================
// Whole-Run Benchmarks
// =============================================================================

fn bench_filter_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_run");
    group.sample_size(10);

    let matrix = random_matrix(256, 256, 7);
    group.throughput(Throughput::Elements((256 * 256) as u64));

    for workers in [1, 2, 4, 8] {
        let config = FilterConfig {
            window_size: 5,
            iterations: 4,
            workers,
        };
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, _| {
            b.iter(|| median_filter(black_box(matrix.view()), &config).unwrap())
        });
    }
    group.finish();
}

// =============================================================================
// Partition Benchmarks
// =============================================================================

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_rows");
    for workers in [1, 8, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &n| {
            b.iter(|| partition_rows(black_box(100_000), n))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_window_median, bench_filter_run, bench_partition);
criterion_main!(benches);
