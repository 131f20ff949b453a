//! f64 transpose built on the 4×4 AVX kernel.

use crate::kernels::kernel_4x4::kernel_4x4_avx;

/// Blocked f64 transpose using the 4×4 AVX kernel.
///
/// Covers the `4⌊rows/4⌋ × 4⌊cols/4⌋` core with register transposes and
/// handles leftover rows and columns with scalar loops.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX
/// - `src.len() == dst.len() == rows * cols`
#[target_feature(enable = "avx")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn transpose_blocked_4x4(src: &[f64], dst: &mut [f64], rows: usize, cols: usize) {
    let rows_main = (rows / 4) * 4;
    let cols_main = (cols / 4) * 4;

    let src_ptr = src.as_ptr();
    let dst_ptr = dst.as_mut_ptr();

    for i in (0..rows_main).step_by(4) {
        for j in (0..cols_main).step_by(4) {
            kernel_4x4_avx(src_ptr.add(i * cols + j), cols, dst_ptr.add(j * rows + i), rows);
        }
    }

    if cols_main < cols {
        edge_case_cols(src, dst, rows, cols, rows_main, cols_main);
    }
    if rows_main < rows {
        edge_case_rows(src, dst, rows, cols, rows_main);
    }
}

/// Right-hand strip: core rows, leftover columns.
fn edge_case_cols(
    src: &[f64],
    dst: &mut [f64],
    rows: usize,
    cols: usize,
    rows_main: usize,
    j_start: usize,
) {
    for i in 0..rows_main {
        for j in j_start..cols {
            dst[j * rows + i] = src[i * cols + j];
        }
    }
}

/// Bottom strip: leftover rows, every column.
fn edge_case_rows(src: &[f64], dst: &mut [f64], rows: usize, cols: usize, i_start: usize) {
    for i in i_start..rows {
        for j in 0..cols {
            dst[j * rows + i] = src[i * cols + j];
        }
    }
}
