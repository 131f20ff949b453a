//! Element types the transpose kernels operate on.

/// Anything that can be copied out of A and into B from a worker thread.
///
/// Transposition never does arithmetic, so the only requirements are
/// `Copy` and thread-safety. This covers `f32`, `f64`, the integer types,
/// and complex pairs such as [`num_complex::Complex64`].
pub trait Element: Copy + Send + Sync {}

impl<T: Copy + Send + Sync> Element for T {}
