//! Matrix multiplication.
//!
//! [`Matrix::matmul`] is the production path: the output is tiled into
//! square blocks of side [`BLOCK_SIZE`], row bands of the output are handed
//! to rayon workers, and within a tile the loops run `i -> k -> j` so the
//! innermost loop streams one row of B and one row of the output.
//!
//! Every output cell is owned by exactly one worker and its k-reduction runs
//! in ascending k order, the same order as the naive triple loop in
//! [`Matrix::mult_sequential`]. The two paths therefore agree up to the
//! compiler's choice of fused multiply-add, not just within a tolerance.

use crate::error::{Result, SkipgramError};
use crate::matrix::{Float, Matrix};
use rayon::prelude::*;

/// Side of the square tiles used by [`Matrix::matmul`].
pub const BLOCK_SIZE: usize = 64;

/// Iterator over `(start, len)` blocks of a `0..total` range.
pub struct BlockIterator {
    total: usize,
    block_size: usize,
    current: usize,
}

impl BlockIterator {
    /// Creates an iterator splitting `0..total` into blocks of `block_size`.
    pub fn new(total: usize, block_size: usize) -> Self {
        Self {
            total,
            block_size,
            current: 0,
        }
    }
}

impl Iterator for BlockIterator {
    /// (start, length) of each block
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.total || self.block_size == 0 {
            return None;
        }

        let start = self.current;
        let len = (self.total - start).min(self.block_size);
        self.current += len;

        Some((start, len))
    }
}

impl<T: Float> Matrix<T> {
    fn check_matmul(&self, rhs: &Self, op: &'static str) -> Result<()> {
        self.ensure_non_empty(rhs, op)?;
        if self.cols != rhs.rows {
            return Err(SkipgramError::shape_mismatch(
                op,
                (self.cols, rhs.cols),
                rhs.shape(),
            ));
        }
        Ok(())
    }

    /// Matrix product `self * rhs` using the cache-blocked parallel kernel.
    ///
    /// Fails with `ZeroSize` if either operand is empty and with
    /// `ShapeMismatch` if `self.cols() != rhs.rows()`.
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        self.check_matmul(rhs, "matmul")?;

        let (m, k) = self.shape();
        let n = rhs.cols;
        let a = &self.data;
        let b = &rhs.data;
        let mut out = Self::zeros(m, n);

        out.data
            .par_chunks_mut(BLOCK_SIZE * n)
            .enumerate()
            .for_each(|(band, c)| {
                let i0 = band * BLOCK_SIZE;
                let band_rows = c.len() / n;
                for (k0, kb) in BlockIterator::new(k, BLOCK_SIZE) {
                    for (j0, jb) in BlockIterator::new(n, BLOCK_SIZE) {
                        tile_kernel(a, b, c, i0, band_rows, k0, kb, j0, jb, k, n);
                    }
                }
            });

        Ok(out)
    }

    /// Matrix product with the naive single-threaded `i -> j -> k` loop.
    ///
    /// Reference implementation for [`matmul`](Self::matmul); same
    /// preconditions and errors.
    pub fn mult_sequential(&self, rhs: &Self) -> Result<Self> {
        self.check_matmul(rhs, "mult_sequential")?;

        let (m, k) = self.shape();
        let n = rhs.cols;
        let mut out = Self::zeros(m, n);

        for i in 0..m {
            for j in 0..n {
                let mut acc = T::zero();
                for p in 0..k {
                    acc += self.data[i * k + p] * rhs.data[p * n + j];
                }
                out.data[i * n + j] = acc;
            }
        }
        Ok(out)
    }
}

/// Accumulates one `(band_rows x kb) * (kb x jb)` tile into the band `c`.
///
/// `c` holds output rows `i0 .. i0 + band_rows`, each `n` wide.
#[inline]
#[allow(clippy::too_many_arguments)]
fn tile_kernel<T: Float>(
    a: &[T],
    b: &[T],
    c: &mut [T],
    i0: usize,
    band_rows: usize,
    k0: usize,
    kb: usize,
    j0: usize,
    jb: usize,
    k: usize,
    n: usize,
) {
    for i in 0..band_rows {
        let a_row = &a[(i0 + i) * k..(i0 + i + 1) * k];
        let c_row = &mut c[i * n + j0..i * n + j0 + jb];
        for p in k0..k0 + kb {
            let a_ip = a_row[p];
            let b_row = &b[p * n + j0..p * n + j0 + jb];
            for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                *c_ij += a_ip * b_pj;
            }
        }
    }
}
