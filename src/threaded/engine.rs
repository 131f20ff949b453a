//! Multi-threaded transpose.
//!
//! One dimension of A is partitioned across workers; each worker owns a
//! disjoint block of B and reads its matching slice of A. Workers are
//! scoped threads spawned and joined inside a single call, so there's no
//! pool, no locking, and nothing outlives the call.

use std::io;
use std::ops::Range;
use std::thread::{self, Scope, ScopedJoinHandle};

use log::debug;

use crate::element::Element;
use crate::error::{Result, TransposeError};
use crate::threaded::partition::partition;
use crate::threaded::view::BlockMut;

/// Which dimension of the source matrix is divided among workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Each worker transposes a band of A's rows (a stripe of B's columns).
    Row,
    /// Each worker transposes a stripe of A's columns (a band of B's rows).
    Column,
}

/// How a worker walks its block.
#[derive(Debug, Clone, Copy)]
enum Tiling {
    Elementwise,
    Blocked { blk_rows: usize, blk_cols: usize },
}

/// Everything one worker needs: the shared source, its own slice of the
/// destination, and the region of A it is responsible for.
struct WorkItem<'a, T> {
    src: &'a [T],
    dst: BlockMut<'a, T>,
    cols: usize,
    row_range: Range<usize>,
    col_range: Range<usize>,
    worker: usize,
}

impl<T: Element> WorkItem<'_, T> {
    fn run(mut self, tiling: Tiling) -> usize {
        match tiling {
            Tiling::Elementwise => {
                self.transpose_tile(self.row_range.clone(), self.col_range.clone());
            }
            Tiling::Blocked { blk_rows, blk_cols } => {
                let (r0, r1) = (self.row_range.start, self.row_range.end);
                let (c0, c1) = (self.col_range.start, self.col_range.end);
                for ii in (r0..r1).step_by(blk_rows) {
                    let i_end = (ii + blk_rows).min(r1);
                    for jj in (c0..c1).step_by(blk_cols) {
                        let j_end = (jj + blk_cols).min(c1);
                        self.transpose_tile(ii..i_end, jj..j_end);
                    }
                }
            }
        }
        self.worker
    }

    /// B[c * rows + r] = A[r * cols + c] over one rectangle of A.
    #[inline]
    fn transpose_tile(&mut self, rows: Range<usize>, cols: Range<usize>) {
        for r in rows {
            let src_row = &self.src[r * self.cols..(r + 1) * self.cols];
            // Row r of A becomes column r of B.
            self.dst.write_column(r, cols.start, &src_row[cols.clone()]);
        }
    }
}

/// Transpose `src` (rows × cols) into `dst` (cols × rows) on `num_threads`
/// worker threads.
///
/// `axis` picks the dimension that gets partitioned. Both axes, and every
/// thread count, produce the same result.
///
/// # Errors
///
/// Argument errors are reported before any thread is started or any
/// element of `dst` is written. If a worker fails to spawn or panics, the
/// error is returned after every started worker has been joined. `dst`
/// is then partially written and must not be used.
///
/// # Example
///
/// ```
/// use transpose_kernels::threaded::engine::{transpose_parallel, Axis};
///
/// let src: Vec<f32> = (0..8 * 16).map(|i| i as f32).collect();
/// let mut dst = vec![0.0; 8 * 16];
///
/// transpose_parallel(&src, &mut dst, 8, 16, 3, Axis::Row).unwrap();
///
/// assert_eq!(dst[1], 16.0); // B[0][1] = A[1][0]
/// ```
pub fn transpose_parallel<T: Element>(
    src: &[T],
    dst: &mut [T],
    rows: usize,
    cols: usize,
    num_threads: usize,
    axis: Axis,
) -> Result<()> {
    run(src, dst, rows, cols, num_threads, axis, Tiling::Elementwise)
}

/// Same as [`transpose_parallel`], but each worker walks its block in
/// `blk_rows × blk_cols` cache tiles.
///
/// # Errors
///
/// Everything [`transpose_parallel`] reports, plus
/// [`TransposeError::InvalidBlockSize`] when either block size is 0.
#[allow(clippy::too_many_arguments)]
pub fn transpose_parallel_blocked<T: Element>(
    src: &[T],
    dst: &mut [T],
    rows: usize,
    cols: usize,
    num_threads: usize,
    axis: Axis,
    blk_rows: usize,
    blk_cols: usize,
) -> Result<()> {
    if blk_rows == 0 || blk_cols == 0 {
        return Err(TransposeError::InvalidBlockSize { blk_rows, blk_cols });
    }
    let tiling = Tiling::Blocked { blk_rows, blk_cols };
    run(src, dst, rows, cols, num_threads, axis, tiling)
}

fn validate(
    src_len: usize,
    dst_len: usize,
    rows: usize,
    cols: usize,
    num_threads: usize,
) -> Result<()> {
    if num_threads == 0 {
        return Err(TransposeError::InvalidThreadCount);
    }
    let expected = rows
        .checked_mul(cols)
        .ok_or(TransposeError::DimensionOverflow { rows, cols })?;
    if src_len != expected {
        return Err(TransposeError::SourceLength { expected, got: src_len });
    }
    if dst_len != expected {
        return Err(TransposeError::DestinationLength { expected, got: dst_len });
    }
    Ok(())
}

/// Build one work item per partition of `axis`.
fn plan<'a, T>(
    src: &'a [T],
    dst: &'a mut [T],
    rows: usize,
    cols: usize,
    num_threads: usize,
    axis: Axis,
) -> Vec<WorkItem<'a, T>> {
    // B is cols × rows: A's rows are B's columns and vice versa.
    let (parts, blocks) = match axis {
        Axis::Row => {
            let parts = partition(rows, num_threads);
            let blocks = BlockMut::split_cols(dst, cols, rows, &parts);
            (parts, blocks)
        }
        Axis::Column => {
            let parts = partition(cols, num_threads);
            let blocks = BlockMut::split_rows(dst, cols, rows, &parts);
            (parts, blocks)
        }
    };
    debug!(
        "transpose {}x{} on {} threads by {:?}: {:?}",
        rows, cols, num_threads, axis, parts
    );

    parts
        .into_iter()
        .zip(blocks)
        .enumerate()
        .map(|(worker, (part, dst))| {
            let (row_range, col_range) = match axis {
                Axis::Row => (part, 0..cols),
                Axis::Column => (0..rows, part),
            };
            WorkItem {
                src,
                dst,
                cols,
                row_range,
                col_range,
                worker,
            }
        })
        .collect()
}

fn run<T: Element>(
    src: &[T],
    dst: &mut [T],
    rows: usize,
    cols: usize,
    num_threads: usize,
    axis: Axis,
    tiling: Tiling,
) -> Result<()> {
    validate(src.len(), dst.len(), rows, cols, num_threads)?;
    let work = plan(src, dst, rows, cols, num_threads, axis);

    let jobs: Vec<_> = work
        .into_iter()
        .map(|item| (item.worker, move || item.run(tiling)))
        .collect();
    thread::scope(|s| spawn_all(s, jobs, spawn_named))
}

type Spawned<'scope> = io::Result<ScopedJoinHandle<'scope, usize>>;

fn spawn_named<'scope, 'env, J>(
    scope: &'scope Scope<'scope, 'env>,
    worker: usize,
    job: J,
) -> Spawned<'scope>
where
    J: FnOnce() -> usize + Send + 'scope,
{
    thread::Builder::new()
        .name(format!("transpose-{}", worker))
        .spawn_scoped(scope, job)
}

/// Start every `(worker, job)` through `spawn`, then join all that started.
///
/// After the first spawn failure no further jobs are started. The first
/// failure is returned, whether a spawn error or a worker panic.
fn spawn_all<'scope, 'env, J, F>(
    scope: &'scope Scope<'scope, 'env>,
    jobs: Vec<(usize, J)>,
    mut spawn: F,
) -> Result<()>
where
    J: FnOnce() -> usize + Send + 'scope,
    F: FnMut(&'scope Scope<'scope, 'env>, usize, J) -> Spawned<'scope>,
{
    let mut handles = Vec::with_capacity(jobs.len());
    let mut failure = None;

    for (worker, job) in jobs {
        match spawn(scope, worker, job) {
            Ok(handle) => {
                debug!("worker {} spawned", worker);
                handles.push((worker, handle));
            }
            Err(source) => {
                // Don't start the rest; the ones already running still get joined.
                failure = Some(TransposeError::WorkerSpawn { worker, source });
                break;
            }
        }
    }

    // Join-all barrier.
    for (worker, handle) in handles {
        match handle.join() {
            Ok(finished) => {
                debug_assert_eq!(finished, worker);
                debug!("worker {} joined", finished);
            }
            Err(_) => {
                failure.get_or_insert(TransposeError::WorkerPanicked { worker });
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::transpose::transpose_naive;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn sequential(rows: usize, cols: usize) -> Vec<f64> {
        (0..rows * cols).map(|i| i as f64).collect()
    }

    #[test]
    fn test_example_8x16_three_threads() {
        let (rows, cols) = (8, 16);
        let a = sequential(rows, cols);

        for axis in [Axis::Row, Axis::Column] {
            let mut b = vec![0.0; rows * cols];
            transpose_parallel(&a, &mut b, rows, cols, 3, axis).unwrap();
            for r in 0..rows {
                for c in 0..cols {
                    assert_eq!(b[c * rows + r], (r * cols + c) as f64);
                }
            }
        }
    }

    #[test]
    fn test_plan_row_partitions() {
        let a = sequential(8, 16);
        let mut b = vec![0.0; 8 * 16];
        let work = plan(&a, &mut b, 8, 16, 3, Axis::Row);

        let ranges: Vec<_> = work.iter().map(|w| w.row_range.clone()).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..8]);
        assert!(work.iter().all(|w| w.col_range == (0..16)));
        assert_eq!(work[2].dst.cols(), 6..8);
        assert_eq!(work[2].dst.rows(), 0..16);
    }

    #[test]
    fn test_plan_column_partitions() {
        let a = sequential(8, 16);
        let mut b = vec![0.0; 8 * 16];
        let work = plan(&a, &mut b, 8, 16, 3, Axis::Column);

        let ranges: Vec<_> = work.iter().map(|w| w.col_range.clone()).collect();
        assert_eq!(ranges, vec![0..6, 6..11, 11..16]);
        assert_eq!(work[1].dst.rows(), 6..11);
        assert_eq!(work[1].dst.cols(), 0..8);
    }

    #[test]
    fn test_blocked_tiling_matches_naive() {
        let (rows, cols) = (19, 23);
        let a = sequential(rows, cols);
        let mut expected = vec![0.0; rows * cols];
        transpose_naive(&a, &mut expected, rows, cols);

        for axis in [Axis::Row, Axis::Column] {
            let mut b = vec![0.0; rows * cols];
            transpose_parallel_blocked(&a, &mut b, rows, cols, 4, axis, 2, 4).unwrap();
            assert_eq!(expected, b);
        }
    }

    #[test]
    fn test_validation_runs_before_any_write() {
        let a = sequential(4, 4);
        let mut b = vec![-1.0; 16];

        assert!(matches!(
            transpose_parallel(&a, &mut b, 4, 4, 0, Axis::Row),
            Err(TransposeError::InvalidThreadCount)
        ));
        assert!(matches!(
            transpose_parallel(&a[..15], &mut b, 4, 4, 2, Axis::Row),
            Err(TransposeError::SourceLength { expected: 16, got: 15 })
        ));
        assert!(matches!(
            transpose_parallel(&a, &mut b[..12], 4, 4, 2, Axis::Column),
            Err(TransposeError::DestinationLength { expected: 16, got: 12 })
        ));
        assert!(matches!(
            transpose_parallel(&a, &mut b, usize::MAX, 2, 2, Axis::Row),
            Err(TransposeError::DimensionOverflow { .. })
        ));
        assert!(matches!(
            transpose_parallel_blocked(&a, &mut b, 4, 4, 2, Axis::Row, 0, 4),
            Err(TransposeError::InvalidBlockSize { blk_rows: 0, blk_cols: 4 })
        ));

        assert!(b.iter().all(|&v| v == -1.0));
    }

    /// Spawns normally except for `failing`, which gets an io::Error.
    fn fail_at<'scope, 'env, J>(
        failing: usize,
    ) -> impl FnMut(&'scope Scope<'scope, 'env>, usize, J) -> Spawned<'scope>
    where
        J: FnOnce() -> usize + Send + 'scope,
        'env: 'scope,
    {
        move |scope, worker, job| {
            if worker == failing {
                Err(io::Error::other("thread limit reached"))
            } else {
                spawn_named(scope, worker, job)
            }
        }
    }

    #[test]
    fn test_spawn_failure_stops_and_joins_started_workers() {
        let ran: Vec<AtomicBool> = (0..5).map(|_| AtomicBool::new(false)).collect();

        let (result, seen) = thread::scope(|s| {
            let jobs: Vec<_> = (0..5)
                .map(|w| {
                    let ran = &ran;
                    (w, move || {
                        ran[w].store(true, Ordering::SeqCst);
                        w
                    })
                })
                .collect();
            let result = spawn_all(s, jobs, fail_at(2));
            // Read before the scope's own implicit join.
            let seen: Vec<bool> = ran.iter().map(|r| r.load(Ordering::SeqCst)).collect();
            (result, seen)
        });

        assert!(matches!(result, Err(TransposeError::WorkerSpawn { worker: 2, .. })));
        assert_eq!(seen, vec![true, true, false, false, false]);
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let result = thread::scope(|s| {
            let jobs: Vec<_> = (0..3)
                .map(|w| {
                    (w, move || {
                        if w == 1 {
                            panic!("worker {} failed", w);
                        }
                        w
                    })
                })
                .collect();
            spawn_all(s, jobs, spawn_named)
        });

        assert!(matches!(result, Err(TransposeError::WorkerPanicked { worker: 1 })));
    }

    #[test]
    fn test_spawn_error_wins_over_later_panic() {
        let result = thread::scope(|s| {
            let jobs: Vec<_> = (0..4)
                .map(|w| {
                    (w, move || {
                        if w == 0 {
                            panic!("worker {} failed", w);
                        }
                        w
                    })
                })
                .collect();
            spawn_all(s, jobs, fail_at(3))
        });

        assert!(matches!(result, Err(TransposeError::WorkerSpawn { worker: 3, .. })));
    }

    #[test]
    fn test_spawn_failure_leaves_started_blocks_written() {
        let (rows, cols) = (8, 16);
        let a = sequential(rows, cols);
        let mut b = vec![-1.0; rows * cols];

        let work = plan(&a, &mut b, rows, cols, 3, Axis::Row);
        let jobs: Vec<_> = work
            .into_iter()
            .map(|item| (item.worker, move || item.run(Tiling::Elementwise)))
            .collect();
        let result = thread::scope(|s| spawn_all(s, jobs, fail_at(2)));
        assert!(matches!(result, Err(TransposeError::WorkerSpawn { worker: 2, .. })));

        // Workers 0 and 1 own A rows 0..6, i.e. B columns 0..6.
        for c in 0..cols {
            for r in 0..rows {
                let got = b[c * rows + r];
                if r < 6 {
                    assert_eq!(got, (r * cols + c) as f64);
                } else {
                    assert_eq!(got, -1.0);
                }
            }
        }
    }
}
