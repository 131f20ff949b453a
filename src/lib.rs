//! Matrix transposition in Rust, from a scalar loop up to AVX and threads.
//!
//! Transpose is pure data movement, so the interesting part is memory
//! access: a naive loop writes the destination with a stride of `rows`
//! elements and misses cache on every store. This crate compares the
//! usual answers: cache blocking, register-level SIMD tiles, and
//! splitting the matrix across threads.
//!
//! ## Usage
//!
//! ```
//! use transpose_kernels::transpose;
//!
//! let a = vec![1.0f32; 256 * 128];
//! let mut b = vec![0.0f32; 128 * 256];
//!
//! transpose(&a, &mut b, 256, 128);
//! ```
//!
//! For large matrices, use the multi-threaded version:
//!
//! ```
//! use transpose_kernels::{transpose_parallel, Axis};
//!
//! let a = vec![1.0f64; 1024 * 1024];
//! let mut b = vec![0.0f64; 1024 * 1024];
//!
//! transpose_parallel(&a, &mut b, 1024, 1024, 4, Axis::Row).unwrap();
//! ```
//!
//! ## What's inside
//!
//! - Generic over the element type: `f32`, `f64`, integers, `Complex<T>`
//! - Cache-blocked transpose with configurable tiles
//! - 4×4 AVX register transpose for f64
//! - Row- or column-partitioned threads with disjoint destination views

pub mod blocked;
pub mod config;
pub mod element;
pub mod error;
pub mod harness;
pub mod kernels;
pub mod matrix;
pub mod threaded;

pub use element::Element;
pub use error::{Result, TransposeError};
pub use matrix::transpose::transpose_naive;
pub use threaded::engine::{Axis, transpose_parallel, transpose_parallel_blocked};

/// Tile edge used by [`transpose`]. 32×32 f64 tiles (8 KiB read, 8 KiB
/// written) fit comfortably in a 32 KiB L1.
pub const DEFAULT_BLOCK: usize = 32;

/// Transpose: dst = src^T
///
/// src is rows×cols and dst is cols×rows, both row-major. Uses the
/// cache-blocked transpose with [`DEFAULT_BLOCK`] tiles.
///
/// # Panics
///
/// Panics if the slice sizes don't match rows × cols.
pub fn transpose<T: Element>(src: &[T], dst: &mut [T], rows: usize, cols: usize) {
    blocked::tiled::transpose_blocked(src, dst, rows, cols, DEFAULT_BLOCK, DEFAULT_BLOCK);
}

/// f64 transpose that picks the fastest kernel for your CPU.
///
/// Uses the 4×4 AVX kernel when available, otherwise falls back to
/// [`transpose`].
///
/// # Panics
///
/// Panics if the slice sizes don't match rows × cols.
pub fn transpose_f64(src: &[f64], dst: &mut [f64], rows: usize, cols: usize) {
    assert_eq!(src.len(), rows * cols, "src: expected {}x{}={} elements", rows, cols, rows * cols);
    assert_eq!(dst.len(), rows * cols, "dst: expected {}x{}={} elements", cols, rows, rows * cols);

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx") {
            unsafe { blocked::simd_4x4::transpose_blocked_4x4(src, dst, rows, cols) };
            return;
        }
    }

    log::debug!("AVX unavailable, using scalar blocked transpose");
    transpose(src, dst, rows, cols);
}
