//! SIMD microkernels for register-level transposition.
//!
//! These transpose small tiles entirely inside vector registers. They're
//! called by the blocked drivers, which handle the matrix edges.
//!
//! Available kernels:
//! - `kernel_4x4`: 4×4 f64 tile, AVX (4 YMM registers)

#[cfg(target_arch = "x86_64")]
pub mod kernel_4x4;
