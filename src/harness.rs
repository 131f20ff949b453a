//! Filling, printing and checking matrices.

use std::fmt::Display;
use std::io::{self, Write};

use rand::Rng;
use rand::distributions::{Distribution, Standard};

/// Overwrite every element of `m` with a random value.
pub fn fill_random<T, R>(m: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
    Standard: Distribution<T>,
{
    for x in m.iter_mut() {
        *x = rng.r#gen();
    }
}

/// Write a row-major `rows × cols` matrix, one row per line.
pub fn write_matrix<T: Display, W: Write>(
    w: &mut W,
    m: &[T],
    rows: usize,
    cols: usize,
) -> io::Result<()> {
    for row in m.chunks(cols.max(1)).take(rows) {
        let mut first = true;
        for x in row {
            if !first {
                write!(w, " ")?;
            }
            write!(w, "{:.3}", x)?;
            first = false;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// First `(r, c)` where `b` (cols × rows) isn't the transpose of `a`
/// (rows × cols), scanning `a` in row-major order.
pub fn first_mismatch<T: PartialEq>(
    a: &[T],
    b: &[T],
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r, c)))
        .find(|&(r, c)| a[r * cols + c] != b[c * rows + r])
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_write_matrix() {
        let m: Vec<u32> = vec![1, 2, 3, 4, 5, 6];
        let mut out = Vec::new();
        write_matrix(&mut out, &m, 2, 3).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 2 3\n4 5 6\n");
    }

    #[test]
    fn test_first_mismatch() {
        let a = vec![1, 2, 3, 4, 5, 6]; // 2×3
        let mut b = vec![1, 4, 2, 5, 3, 6]; // 3×2
        assert_eq!(first_mismatch(&a, &b, 2, 3), None);

        b[3] = 0; // B[1][1] = A[1][1]
        assert_eq!(first_mismatch(&a, &b, 2, 3), Some((1, 1)));
    }

    #[test]
    fn test_fill_random_is_seeded() {
        let mut x = vec![0.0f64; 32];
        let mut y = vec![0.0f64; 32];
        fill_random(&mut x, &mut StdRng::seed_from_u64(7));
        fill_random(&mut y, &mut StdRng::seed_from_u64(7));
        assert_eq!(x, y);
        assert!(x.iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_fill_random_complex() {
        let mut m = vec![Complex64::new(0.0, 0.0); 8];
        fill_random(&mut m, &mut StdRng::seed_from_u64(1));
        assert!(m.iter().any(|z| z.im != 0.0));
    }
}
