//! Exclusive views into disjoint regions of the destination matrix.
//!
//! A row-partitioned transpose writes a *column* stripe of B, which is
//! strided and can't be carved out with `split_at_mut`. `BlockMut` fills
//! that gap: it is a rectangular window onto B that borrows B mutably for
//! `'a`, and the only way to obtain one is to split a whole `&mut [T]`
//! into pairwise-disjoint windows. Two workers can never alias.

use std::marker::PhantomData;
use std::ops::Range;
use std::ptr::NonNull;

/// Exclusive write access to `rows × cols` of a row-major matrix with
/// leading dimension `ld`.
#[derive(Debug)]
pub struct BlockMut<'a, T> {
    base: NonNull<T>,
    ld: usize,
    rows: Range<usize>,
    cols: Range<usize>,
    _marker: PhantomData<&'a mut [T]>,
}

// A BlockMut is a `&mut` to its own cells only.
unsafe impl<T: Send> Send for BlockMut<'_, T> {}

impl<'a, T> BlockMut<'a, T> {
    /// Split `data` (`nrows × ncols`) into horizontal bands, one per range
    /// of rows. Each band spans every column.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != nrows * ncols`, or if `parts` aren't
    /// ascending, non-overlapping ranges within `0..nrows`.
    pub fn split_rows(
        data: &'a mut [T],
        nrows: usize,
        ncols: usize,
        parts: &[Range<usize>],
    ) -> Vec<Self> {
        check_layout(data.len(), nrows, ncols);
        check_disjoint(parts, nrows);
        let base = base_ptr(data);
        parts
            .iter()
            .map(|rows| Self::new(base, ncols, rows.clone(), 0..ncols))
            .collect()
    }

    /// Split `data` (`nrows × ncols`) into vertical stripes, one per range
    /// of columns. Each stripe spans every row.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != nrows * ncols`, or if `parts` aren't
    /// ascending, non-overlapping ranges within `0..ncols`.
    pub fn split_cols(
        data: &'a mut [T],
        nrows: usize,
        ncols: usize,
        parts: &[Range<usize>],
    ) -> Vec<Self> {
        check_layout(data.len(), nrows, ncols);
        check_disjoint(parts, ncols);
        let base = base_ptr(data);
        parts
            .iter()
            .map(|cols| Self::new(base, ncols, 0..nrows, cols.clone()))
            .collect()
    }

    fn new(base: NonNull<T>, ld: usize, rows: Range<usize>, cols: Range<usize>) -> Self {
        Self {
            base,
            ld,
            rows,
            cols,
            _marker: PhantomData,
        }
    }

    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    pub fn cols(&self) -> Range<usize> {
        self.cols.clone()
    }

    /// Store `value` at `(row, col)` of the underlying matrix.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside this block.
    #[inline]
    pub fn write(&mut self, row: usize, col: usize, value: T) {
        assert!(
            self.rows.contains(&row) && self.cols.contains(&col),
            "({}, {}) outside block {:?} x {:?}",
            row,
            col,
            self.rows,
            self.cols
        );
        // SAFETY: the split constructors checked that every block lies
        // inside the buffer and that no two blocks share a cell, and the
        // assert above keeps this write inside our block.
        unsafe { self.base.as_ptr().add(row * self.ld + col).write(value) }
    }
}

impl<T: Copy> BlockMut<'_, T> {
    /// Store `values` down column `col`, starting at `start_row`.
    ///
    /// The bounds are checked once for the whole run.
    ///
    /// # Panics
    ///
    /// Panics if any target cell lies outside this block.
    #[inline]
    pub fn write_column(&mut self, col: usize, start_row: usize, values: &[T]) {
        assert!(
            self.cols.contains(&col)
                && start_row >= self.rows.start
                && start_row <= self.rows.end
                && values.len() <= self.rows.end - start_row,
            "column {} rows {}..{} outside block {:?} x {:?}",
            col,
            start_row,
            start_row + values.len(),
            self.rows,
            self.cols
        );
        for (i, &value) in values.iter().enumerate() {
            // SAFETY: the assert above keeps every row in `self.rows` and
            // `col` in `self.cols`, which the split constructors made
            // exclusive to this block.
            unsafe {
                self.base
                    .as_ptr()
                    .add((start_row + i) * self.ld + col)
                    .write(value)
            }
        }
    }
}

fn base_ptr<T>(data: &mut [T]) -> NonNull<T> {
    // Slices are never null, even when empty.
    NonNull::from(data).cast()
}

fn check_layout(len: usize, nrows: usize, ncols: usize) {
    assert_eq!(
        Some(len),
        nrows.checked_mul(ncols),
        "buffer of {} elements is not {}x{}",
        len,
        nrows,
        ncols
    );
}

fn check_disjoint(parts: &[Range<usize>], dimension: usize) {
    let mut floor = 0;
    for part in parts {
        assert!(
            part.start >= floor && part.start <= part.end && part.end <= dimension,
            "range {:?} overlaps a previous range or exceeds {}",
            part,
            dimension
        );
        floor = part.end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_cols_writes_land_in_place() {
        let mut data = vec![0u32; 3 * 4];
        {
            let mut blocks = BlockMut::split_cols(&mut data, 3, 4, &[0..1, 1..4]);
            for (id, block) in blocks.iter_mut().enumerate() {
                for r in block.rows() {
                    for c in block.cols() {
                        block.write(r, c, id as u32 + 1);
                    }
                }
            }
        }
        assert_eq!(data, vec![1, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2]);
    }

    #[test]
    fn test_split_rows_writes_land_in_place() {
        let mut data = vec![0u32; 3 * 2];
        {
            let mut blocks = BlockMut::split_rows(&mut data, 3, 2, &[0..2, 2..3]);
            blocks[0].write(1, 1, 7);
            blocks[1].write(2, 0, 9);
        }
        assert_eq!(data, vec![0, 0, 0, 7, 9, 0]);
    }

    #[test]
    #[should_panic(expected = "outside block")]
    fn test_write_outside_block_panics() {
        let mut data = vec![0u8; 4];
        let mut blocks = BlockMut::split_cols(&mut data, 2, 2, &[0..1, 1..2]);
        blocks[0].write(0, 1, 1);
    }

    #[test]
    fn test_write_column_strides_down() {
        let mut data = vec![0u32; 4 * 3];
        {
            let mut blocks = BlockMut::split_cols(&mut data, 4, 3, &[0..1, 1..3]);
            blocks[1].write_column(2, 1, &[5, 6, 7]);
            blocks[0].write_column(0, 4, &[]);
        }
        assert_eq!(data, vec![0, 0, 0, 0, 0, 5, 0, 0, 6, 0, 0, 7]);
    }

    #[test]
    #[should_panic(expected = "outside block")]
    fn test_write_column_past_block_end_panics() {
        let mut data = vec![0u32; 4 * 2];
        let mut blocks = BlockMut::split_rows(&mut data, 4, 2, &[0..2, 2..4]);
        blocks[0].write_column(1, 1, &[1, 2]);
    }

    #[test]
    #[should_panic(expected = "overlaps")]
    fn test_overlapping_split_panics() {
        let mut data = vec![0u8; 6];
        BlockMut::split_rows(&mut data, 3, 2, &[0..2, 1..3]);
    }

    #[test]
    #[should_panic(expected = "is not")]
    fn test_bad_layout_panics() {
        let mut data = vec![0u8; 5];
        BlockMut::split_rows(&mut data, 3, 2, &[0..3]);
    }

    #[test]
    fn test_empty_buffer() {
        let mut data: Vec<f64> = Vec::new();
        let blocks = BlockMut::split_cols(&mut data, 0, 5, &[0..3, 3..5]);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].rows().is_empty());
    }
}
