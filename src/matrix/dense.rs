//! Owned, row-major dense matrix.

use crate::error::{Result, SkipgramError};
use crate::matrix::Float;
use rand::Rng;
use rayon::prelude::*;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Element count at which copies and elementwise maps switch to rayon.
pub const PARALLEL_THRESHOLD: usize = 1 << 14;

/// Dense 2-D matrix that exclusively owns a contiguous row-major buffer.
///
/// A matrix with either dimension zero is the canonical empty matrix:
/// `rows == 0`, `cols == 0` and no storage. Cloning deep-copies the buffer;
/// [`Matrix::take`] moves the buffer out and leaves the source empty.
#[derive(Debug, PartialEq)]
pub struct Matrix<T: Float> {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) data: Vec<T>,
}

impl<T: Float> Matrix<T> {
    /// Allocates a `rows x cols` matrix.
    ///
    /// The contents are unspecified until the caller initializes them with
    /// [`fill`](Self::fill), [`random_init`](Self::random_init), a load, or
    /// per-element assignment. Do not read a fresh matrix before that; use
    /// [`zeros`](Self::zeros) when a defined starting value is needed.
    /// Either dimension being zero yields the empty matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::zeros(rows, cols)
    }

    /// Creates a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::zero())
    }

    /// Creates a matrix with every element set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        if rows == 0 || cols == 0 {
            return Self::empty();
        }
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// The canonical empty matrix.
    pub fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            data: Vec::new(),
        }
    }

    /// Wraps row-major data; `data.len()` must equal `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            if data.is_empty() {
                return Ok(Self::empty());
            }
            return Err(SkipgramError::shape_mismatch(
                "from_vec",
                (rows, cols),
                (1, data.len()),
            ));
        }
        if data.len() != rows * cols {
            return Err(SkipgramError::shape_mismatch(
                "from_vec",
                (rows, cols),
                (1, data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix by calling `f(row, col)` for every element.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        if rows == 0 || cols == 0 {
            return Self::empty();
        }
        let data = (0..rows * cols).map(|idx| f(idx / cols, idx % cols)).collect();
        Self { rows, cols, data }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for the canonical empty matrix.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major view of the buffer.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the matrix and returns its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Row `i` as a slice of `cols` elements, or `None` when `i >= rows`.
    ///
    /// Column access through the returned slice is bounds-checked by the
    /// slice itself: an index `>= cols` panics instead of reading the next row.
    #[inline]
    pub fn row(&self, i: usize) -> Option<&[T]> {
        if i >= self.rows {
            return None;
        }
        let start = i * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    /// Mutable row `i`, or `None` when `i >= rows`.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> Option<&mut [T]> {
        if i >= self.rows {
            return None;
        }
        let start = i * self.cols;
        Some(&mut self.data[start..start + self.cols])
    }

    /// Element `(i, j)`, or `None` when either index is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if j >= self.cols {
            return None;
        }
        self.row(i).map(|r| r[j])
    }

    /// Mutable element `(i, j)`, or `None` when either index is out of range.
    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if j >= self.cols {
            return None;
        }
        self.row_mut(i).map(|r| &mut r[j])
    }

    /// Iterator over the rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact(0) panics, and the empty matrix has no rows anyway
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.map_in_place(|_| value);
    }

    /// Fills the matrix with integers drawn uniformly from `0..10`.
    pub fn random_init<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for x in self.data.iter_mut() {
            *x = T::from_f64(rng.gen_range(0..10) as f64);
        }
    }

    /// Fills the matrix uniformly from `[low, high)`.
    pub fn random_uniform<R: Rng + ?Sized>(&mut self, rng: &mut R, low: T, high: T) {
        for x in self.data.iter_mut() {
            *x = rng.gen_range(low..high);
        }
    }

    /// Moves the buffer out, leaving `self` as the empty matrix.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Applies `f` to every element in place.
    pub fn map_in_place<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Sync + Send,
    {
        if self.data.len() >= PARALLEL_THRESHOLD {
            self.data.par_iter_mut().for_each(|x| *x = f(*x));
        } else {
            self.data.iter_mut().for_each(|x| *x = f(*x));
        }
    }

    /// Returns a new matrix with `f` applied to every element.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T + Sync + Send,
    {
        let mut out = self.clone();
        out.map_in_place(f);
        out
    }

    /// Combines `self` with a same-shaped matrix in place, element by element.
    ///
    /// Callers check shapes first.
    pub(crate) fn zip_in_place<F>(&mut self, other: &Self, f: F)
    where
        F: Fn(T, T) -> T + Sync + Send,
    {
        debug_assert_eq!(self.shape(), other.shape());
        if self.data.len() >= PARALLEL_THRESHOLD {
            self.data
                .par_iter_mut()
                .zip(other.data.par_iter())
                .for_each(|(a, &b)| *a = f(*a, b));
        } else {
            self.data
                .iter_mut()
                .zip(other.data.iter())
                .for_each(|(a, &b)| *a = f(*a, b));
        }
    }
}

impl<T: Float> Default for Matrix<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Float> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        let data = if self.data.len() >= PARALLEL_THRESHOLD {
            self.data.par_iter().copied().collect()
        } else {
            self.data.clone()
        };
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }
}

impl<T: Float> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(i < self.rows, "row index {} out of bounds {}", i, self.rows);
        assert!(j < self.cols, "col index {} out of bounds {}", j, self.cols);
        &self.data[i * self.cols + j]
    }
}

impl<T: Float> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(i < self.rows, "row index {} out of bounds {}", i, self.rows);
        assert!(j < self.cols, "col index {} out of bounds {}", j, self.cols);
        &mut self.data[i * self.cols + j]
    }
}

impl<T: Float> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", x)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) layout: one row per line, elements
/// separated by whitespace.
///
/// Blank lines are ignored and every row must have the same length. Input
/// with no elements yields the empty matrix.
impl<T: Float> FromStr for Matrix<T> {
    type Err = SkipgramError;

    fn from_str(s: &str) -> Result<Self> {
        let mut rows = 0;
        let mut cols = 0;
        let mut data = Vec::new();

        for (line_no, line) in s.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let before = data.len();
            for field in line.split_whitespace() {
                let value = field.parse::<T>().map_err(|_| {
                    SkipgramError::InvalidFormat(format!(
                        "line {}: invalid number '{}'",
                        line_no + 1,
                        field
                    ))
                })?;
                data.push(value);
            }
            let width = data.len() - before;
            if rows == 0 {
                cols = width;
            } else if width != cols {
                return Err(SkipgramError::InvalidFormat(format!(
                    "line {}: expected {} values, found {}",
                    line_no + 1,
                    cols,
                    width
                )));
            }
            rows += 1;
        }

        Self::from_vec(rows, cols, data)
    }
}
