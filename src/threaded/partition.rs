//! Balanced splitting of one matrix dimension across workers.

use std::ops::Range;

/// Iterator over the ranges produced by [`partition`].
///
/// The first `dimension % num_workers` ranges are one element longer than
/// the rest. Ranges are contiguous and ascending, so range `i` starts where
/// range `i - 1` ended.
#[derive(Debug, Clone)]
pub struct Partitions {
    base: usize,
    extra: usize,
    next_worker: usize,
    num_workers: usize,
    start: usize,
}

impl Partitions {
    pub fn new(dimension: usize, num_workers: usize) -> Self {
        let (base, extra) = if num_workers == 0 {
            (0, 0)
        } else {
            (dimension / num_workers, dimension % num_workers)
        };
        Self {
            base,
            extra,
            next_worker: 0,
            num_workers,
            start: 0,
        }
    }
}

impl Iterator for Partitions {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        if self.next_worker == self.num_workers {
            return None;
        }
        let len = if self.next_worker < self.extra {
            self.base + 1
        } else {
            self.base
        };
        let range = self.start..self.start + len;
        self.start = range.end;
        self.next_worker += 1;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_workers - self.next_worker;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Partitions {}

/// Divide `[0, dimension)` into `num_workers` contiguous half-open ranges.
///
/// Sizes differ by at most one. When there are more workers than
/// elements, the trailing ranges are empty. A zero dimension yields
/// `num_workers` copies of `0..0`.
///
/// # Example
///
/// ```
/// use transpose_kernels::threaded::partition::partition;
///
/// assert_eq!(partition(8, 3), vec![0..3, 3..6, 6..8]);
/// assert_eq!(partition(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
/// ```
pub fn partition(dimension: usize, num_workers: usize) -> Vec<Range<usize>> {
    Partitions::new(dimension, num_workers).collect()
}
