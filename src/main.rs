//! Correctness and timing runner for the transpose implementations.
//!
//! Matrix shape, tiles and thread count come from `TRANSPOSE_*`
//! environment variables (see [`RunConfig::from_env`]).

use std::fmt::Display;
use std::io;
use std::process::ExitCode;
use std::time::Instant;

use num_complex::Complex64;
use rand::distributions::{Distribution, Standard};
use rand::thread_rng;
use transpose_kernels::blocked::tiled::transpose_blocked;
use transpose_kernels::config::RunConfig;
use transpose_kernels::harness::{fill_random, first_mismatch, write_matrix};
use transpose_kernels::{
    Axis, Element, Result, transpose_f64, transpose_naive, transpose_parallel,
    transpose_parallel_blocked,
};

/// Matrices up to this many elements are printed before and after.
const PRINT_LIMIT: usize = 256;

type Strategy<'a, T> = (String, Box<dyn Fn(&[T], &mut [T]) -> Result<()> + 'a>);

fn main() -> ExitCode {
    let config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("=== Matrix Transpose ===\n");
    println!(
        "Matrix: {}×{}, block: {}×{}, threads: {}, iterations: {}\n",
        config.rows,
        config.cols,
        config.blk_rows,
        config.blk_cols,
        config.num_threads,
        config.iterations
    );

    let mut failures = 0;

    let f64_extra: Vec<Strategy<f64>> = vec![(
        "simd (4×4 AVX dispatch)".to_string(),
        Box::new(|a: &[f64], b: &mut [f64]| {
            transpose_f64(a, b, config.rows, config.cols);
            Ok(())
        }),
    )];
    failures += run_suite::<f64>("f64", &config, f64_extra);
    failures += run_suite::<f32>("f32", &config, Vec::new());
    failures += run_suite::<Complex64>("complex64", &config, Vec::new());

    println!("{}", "=".repeat(70));
    if failures == 0 {
        println!("Success");
        ExitCode::SUCCESS
    } else {
        println!("Failed ({} strategies)", failures);
        ExitCode::FAILURE
    }
}

/// Run every strategy on one random matrix of `T`. Returns the number of
/// strategies that errored or produced a wrong transpose.
fn run_suite<'a, T>(type_name: &str, config: &'a RunConfig, extra: Vec<Strategy<'a, T>>) -> usize
where
    T: Element + PartialEq + Display + Default + 'a,
    Standard: Distribution<T>,
{
    let (rows, cols) = (config.rows, config.cols);
    let mut a = vec![T::default(); config.len()];
    fill_random(&mut a, &mut thread_rng());

    println!("{}", "-".repeat(70));
    println!("{}", type_name);
    println!("{}", "-".repeat(70));

    if config.len() <= PRINT_LIMIT {
        println!("In:");
        print_matrix(&a, rows, cols);
    }

    let mut strategies = builtin_strategies::<T>(config);
    strategies.extend(extra);

    let mut failures = 0;
    for (name, f) in &strategies {
        match bench_fn(&a, config, f) {
            Ok((b, time_ms, gbps)) => {
                let status = match first_mismatch(&a, &b, rows, cols) {
                    None => "Success",
                    Some((r, c)) => {
                        println!("  mismatch at ({}, {})", r, c);
                        failures += 1;
                        "Failed"
                    }
                };
                println!("{:34} {:8} {:10.3} ms  {:7.2} GB/s", name, status, time_ms, gbps);
                if config.len() <= PRINT_LIMIT && status == "Failed" {
                    println!("Out:");
                    print_matrix(&b, cols, rows);
                }
            }
            Err(e) => {
                println!("{:34} Failed: {}", name, e);
                failures += 1;
            }
        }
    }
    println!();
    failures
}

fn builtin_strategies<'a, T: Element + 'a>(config: &'a RunConfig) -> Vec<Strategy<'a, T>> {
    let (rows, cols) = (config.rows, config.cols);
    let (blk_rows, blk_cols) = (config.blk_rows, config.blk_cols);
    let threads = config.num_threads;

    let mut strategies: Vec<Strategy<'a, T>> = vec![
        (
            "naive".to_string(),
            Box::new(move |a: &[T], b: &mut [T]| {
                transpose_naive(a, b, rows, cols);
                Ok(())
            }),
        ),
        (
            format!("blocked ({}×{})", blk_rows, blk_cols),
            Box::new(move |a: &[T], b: &mut [T]| {
                transpose_blocked(a, b, rows, cols, blk_rows, blk_cols);
                Ok(())
            }),
        ),
    ];

    for axis in [Axis::Row, Axis::Column] {
        strategies.push((
            format!("threads {:?} ({})", axis, threads),
            Box::new(move |a: &[T], b: &mut [T]| {
                transpose_parallel(a, b, rows, cols, threads, axis)
            }),
        ));
        strategies.push((
            format!("threads {:?} blocked ({})", axis, threads),
            Box::new(move |a: &[T], b: &mut [T]| {
                transpose_parallel_blocked(a, b, rows, cols, threads, axis, blk_rows, blk_cols)
            }),
        ));
    }

    strategies
}

/// Warm up once, then time `config.iterations` runs. Returns the last
/// output with the average time in ms and effective bandwidth in GB/s.
fn bench_fn<T, F>(a: &[T], config: &RunConfig, f: &F) -> Result<(Vec<T>, f64, f64)>
where
    T: Element + Default,
    F: Fn(&[T], &mut [T]) -> Result<()> + ?Sized,
{
    // Warmup
    let mut b = vec![T::default(); a.len()];
    f(a, &mut b)?;

    let mut total = 0.0;
    for _ in 0..config.iterations {
        b = vec![T::default(); a.len()];
        let start = Instant::now();
        f(a, &mut b)?;
        total += start.elapsed().as_secs_f64();
    }

    let avg = total / config.iterations as f64;
    // Every element is read once and written once.
    let bytes = 2.0 * (a.len() * size_of::<T>()) as f64;
    let gbps = if avg > 0.0 { bytes / avg / 1e9 } else { 0.0 };
    Ok((b, avg * 1000.0, gbps))
}

fn print_matrix<T: Display>(m: &[T], rows: usize, cols: usize) {
    let stdout = io::stdout();
    if let Err(e) = write_matrix(&mut stdout.lock(), m, rows, cols) {
        eprintln!("error: failed to print matrix: {}", e);
    }
}
