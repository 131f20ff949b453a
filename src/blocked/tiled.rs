//! Cache-blocked scalar transpose.

use crate::element::Element;

/// Cache-blocked transpose: dst = src^T, one `blk_rows × blk_cols` tile at a time.
///
/// Walking src row by row writes dst with stride `rows`, which misses
/// cache on every store once a column of dst no longer fits. Tiling keeps
/// both the tile being read and the tile being written resident.
/// Tiles are clipped at the right and bottom edges, so the block sizes
/// don't need to divide the matrix.
///
/// # Panics
///
/// Panics if either block size is 0 or the slice sizes don't match
/// rows × cols.
pub fn transpose_blocked<T: Element>(
    src: &[T],
    dst: &mut [T],
    rows: usize,
    cols: usize,
    blk_rows: usize,
    blk_cols: usize,
) {
    assert!(blk_rows > 0 && blk_cols > 0, "block size must be at least 1x1");
    assert_eq!(src.len(), rows * cols, "src: expected {}x{}={} elements", rows, cols, rows * cols);
    assert_eq!(dst.len(), rows * cols, "dst: expected {}x{}={} elements", cols, rows, rows * cols);

    for ii in (0..rows).step_by(blk_rows) {
        let i_end = (ii + blk_rows).min(rows);
        for jj in (0..cols).step_by(blk_cols) {
            let j_end = (jj + blk_cols).min(cols);
            transpose_tile(src, dst, rows, cols, ii..i_end, jj..j_end);
        }
    }
}

#[inline]
fn transpose_tile<T: Element>(
    src: &[T],
    dst: &mut [T],
    rows: usize,
    cols: usize,
    tile_rows: std::ops::Range<usize>,
    tile_cols: std::ops::Range<usize>,
) {
    for i in tile_rows {
        for j in tile_cols.clone() {
            dst[j * rows + i] = src[i * cols + j];
        }
    }
}
