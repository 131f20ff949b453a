//! 4×4 AVX register transpose for f64.

/// Transposes one 4×4 tile: dst[j][i] = src[i][j] for i, j in 0..4
///
/// Loads four rows of src into YMM registers, interleaves pairs of rows
/// with unpacklo/unpackhi, then swaps 128-bit halves with permute2f128 so
/// each register ends up holding one column. Four loads, eight shuffles,
/// four stores.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX (checked via `#[target_feature]`)
/// - `src.add(row * lds)` is valid for row in 0..4, each allowing a read of 4 f64s
/// - `dst.add(row * ldd)` is valid for row in 0..4, each allowing a write of 4 f64s
/// - the two tiles don't overlap
#[target_feature(enable = "avx")]
#[allow(clippy::identity_op)]
#[allow(clippy::erasing_op)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_4x4_avx(src: *const f64, lds: usize, dst: *mut f64, ldd: usize) {
    use std::arch::x86_64::*;

    let r0 = _mm256_loadu_pd(src.add(0 * lds));
    let r1 = _mm256_loadu_pd(src.add(1 * lds));
    let r2 = _mm256_loadu_pd(src.add(2 * lds));
    let r3 = _mm256_loadu_pd(src.add(3 * lds));

    // t0 = [r0.0 r1.0 r0.2 r1.2], t1 = [r0.1 r1.1 r0.3 r1.3]
    let t0 = _mm256_unpacklo_pd(r0, r1);
    let t1 = _mm256_unpackhi_pd(r0, r1);
    let t2 = _mm256_unpacklo_pd(r2, r3);
    let t3 = _mm256_unpackhi_pd(r2, r3);

    // 0x20 takes both low halves, 0x31 both high halves
    let c0 = _mm256_permute2f128_pd::<0x20>(t0, t2);
    let c1 = _mm256_permute2f128_pd::<0x20>(t1, t3);
    let c2 = _mm256_permute2f128_pd::<0x31>(t0, t2);
    let c3 = _mm256_permute2f128_pd::<0x31>(t1, t3);

    _mm256_storeu_pd(dst.add(0 * ldd), c0);
    _mm256_storeu_pd(dst.add(1 * ldd), c1);
    _mm256_storeu_pd(dst.add(2 * ldd), c2);
    _mm256_storeu_pd(dst.add(3 * ldd), c3);
}
