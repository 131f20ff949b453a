//! Scalar transpose.
//!
//! The correctness baseline the blocked, threaded and SIMD
//! implementations are compared against.

pub mod transpose;
