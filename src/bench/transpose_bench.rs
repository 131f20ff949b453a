use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use transpose_kernels::blocked::tiled::transpose_blocked;
use transpose_kernels::{
    Axis, transpose_f64, transpose_naive, transpose_parallel, transpose_parallel_blocked,
};

fn bench_single_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("Transpose_f64");
    group.sample_size(20);

    for size in [256, 512, 1024, 2048].iter() {
        let n = *size;
        let a: Vec<f64> = (0..n * n).map(|i| (i % 1000) as f64).collect();
        let mut b = vec![0.0; n * n];

        // One read and one write per element
        group.throughput(Throughput::Bytes((2 * n * n * size_of::<f64>()) as u64));

        group.bench_with_input(BenchmarkId::new("Naive", n), &n, |bench, &n| {
            bench.iter(|| transpose_naive(black_box(&a), &mut b, n, n));
        });

        group.bench_with_input(BenchmarkId::new("Blocked32", n), &n, |bench, &n| {
            bench.iter(|| transpose_blocked(black_box(&a), &mut b, n, n, 32, 32));
        });

        group.bench_with_input(BenchmarkId::new("Simd4x4", n), &n, |bench, &n| {
            bench.iter(|| transpose_f64(black_box(&a), &mut b, n, n));
        });
    }

    group.finish();
}

fn bench_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("TransposeThreads_f64");
    group.sample_size(20);

    let n = 2048;
    let a: Vec<f64> = (0..n * n).map(|i| (i % 1000) as f64).collect();
    let mut b = vec![0.0; n * n];
    group.throughput(Throughput::Bytes((2 * n * n * size_of::<f64>()) as u64));

    for threads in [1, 2, 4, 8].iter() {
        let t = *threads;

        group.bench_with_input(BenchmarkId::new("Row", t), &t, |bench, &t| {
            bench.iter(|| transpose_parallel(black_box(&a), &mut b, n, n, t, Axis::Row));
        });

        group.bench_with_input(BenchmarkId::new("Column", t), &t, |bench, &t| {
            bench.iter(|| transpose_parallel(black_box(&a), &mut b, n, n, t, Axis::Column));
        });

        group.bench_with_input(BenchmarkId::new("ColumnBlocked32", t), &t, |bench, &t| {
            bench.iter(|| {
                transpose_parallel_blocked(black_box(&a), &mut b, n, n, t, Axis::Column, 32, 32)
            });
        });
    }

    group.finish();
}

fn bench_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("Transpose_f32");
    group.sample_size(20);

    for size in [512, 2048].iter() {
        let n = *size;
        let a: Vec<f32> = (0..n * n).map(|i| (i % 1000) as f32).collect();
        let mut b = vec![0.0f32; n * n];
        group.throughput(Throughput::Bytes((2 * n * n * size_of::<f32>()) as u64));

        group.bench_with_input(BenchmarkId::new("Blocked32", n), &n, |bench, &n| {
            bench.iter(|| transpose_blocked(black_box(&a), &mut b, n, n, 32, 32));
        });

        group.bench_with_input(BenchmarkId::new("Row4", n), &n, |bench, &n| {
            bench.iter(|| transpose_parallel(black_box(&a), &mut b, n, n, 4, Axis::Row));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_threaded, bench_threaded, bench_f32);
criterion_main!(benches);
