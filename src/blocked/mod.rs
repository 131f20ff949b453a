//! Cache-blocked transpose implementations.
//!
//! These break the transpose into tiles small enough that the source
//! rows being read and the destination rows being written both stay in
//! L1 cache.
//!
//! Available implementations:
//! - `tiled`: Generic scalar tiles of any size
//! - `simd_4x4`: f64 tiles transposed in AVX registers

#[cfg(target_arch = "x86_64")]
pub mod simd_4x4;
pub mod tiled;
