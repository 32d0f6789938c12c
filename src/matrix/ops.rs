//! Elementwise arithmetic, transpose and reductions.

use crate::error::{Result, SkipgramError};
use crate::matrix::{Float, Matrix};
use rayon::prelude::*;
use std::ops::{DivAssign, Mul, MulAssign};

impl<T: Float> Matrix<T> {
    pub(crate) fn ensure_same_shape(&self, other: &Self, op: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(SkipgramError::shape_mismatch(op, self.shape(), other.shape()));
        }
        Ok(())
    }

    pub(crate) fn ensure_non_empty(&self, other: &Self, op: &'static str) -> Result<()> {
        if self.is_empty() || other.is_empty() {
            return Err(SkipgramError::ZeroSize { op });
        }
        Ok(())
    }

    /// `self + rhs`, elementwise.
    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.try_add_assign(rhs)?;
        Ok(out)
    }

    /// `self - rhs`, elementwise.
    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.try_sub_assign(rhs)?;
        Ok(out)
    }

    /// `self += rhs`, elementwise.
    pub fn try_add_assign(&mut self, rhs: &Self) -> Result<()> {
        self.ensure_same_shape(rhs, "add")?;
        self.zip_in_place(rhs, |a, b| a + b);
        Ok(())
    }

    /// `self -= rhs`, elementwise.
    pub fn try_sub_assign(&mut self, rhs: &Self) -> Result<()> {
        self.ensure_same_shape(rhs, "sub")?;
        self.zip_in_place(rhs, |a, b| a - b);
        Ok(())
    }

    /// Elementwise (Hadamard) product. Both operands must be non-empty.
    pub fn hadamard(&self, rhs: &Self) -> Result<Self> {
        self.ensure_non_empty(rhs, "hadamard")?;
        self.ensure_same_shape(rhs, "hadamard")?;
        let mut out = self.clone();
        out.zip_in_place(rhs, |a, b| a * b);
        Ok(out)
    }

    /// Returns `self * scalar`.
    pub fn scale(&self, scalar: T) -> Self {
        self.map(|x| x * scalar)
    }

    /// Returns the `cols x rows` transpose.
    pub fn transpose(&self) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let (rows, cols) = self.shape();
        let src = &self.data;
        let mut out = Self::zeros(cols, rows);

        // Each output row j is column j of the input.
        out.data
            .par_chunks_mut(rows)
            .enumerate()
            .for_each(|(j, out_row)| {
                for (i, x) in out_row.iter_mut().enumerate() {
                    *x = src[i * cols + j];
                }
            });
        out
    }

    /// Sum of all elements.
    ///
    /// Large matrices are reduced in parallel, so the association order and
    /// the last bits of the result can differ between runs.
    pub fn sum(&self) -> T {
        if self.data.len() >= super::PARALLEL_THRESHOLD {
            self.data.par_iter().copied().sum()
        } else {
            self.data.iter().copied().sum()
        }
    }

    /// Largest element, or `None` for the empty matrix.
    pub fn max(&self) -> Option<T> {
        self.data.iter().copied().reduce(Float::max)
    }
}

impl<T: Float> MulAssign<T> for Matrix<T> {
    fn mul_assign(&mut self, scalar: T) {
        self.map_in_place(|x| x * scalar);
    }
}

impl<T: Float> DivAssign<T> for Matrix<T> {
    fn div_assign(&mut self, scalar: T) {
        self.map_in_place(|x| x / scalar);
    }
}

impl<T: Float> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, scalar: T) -> Matrix<T> {
        self.scale(scalar)
    }
}
