//! Elementwise activations, normalization and softmax.
//!
//! The `*_derivative` helpers take an already-activated matrix: call
//! `m.sigmoid().sigmoid_derivative()`, not `m.sigmoid_derivative()`.

use crate::error::Result;
use crate::matrix::{Float, Matrix};
use rayon::prelude::*;

/// Logistic function `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid<T: Float>(x: T) -> T {
    T::one() / (T::one() + (-x).exp())
}

/// Numerically stable softmax of `src` written into `dst`.
pub(crate) fn softmax_into_slice<T: Float>(src: &[T], dst: &mut [T]) {
    debug_assert_eq!(src.len(), dst.len());
    let max_v = src.iter().copied().fold(T::neg_infinity(), Float::max);
    let mut sum = T::zero();
    for (d, &x) in dst.iter_mut().zip(src) {
        *d = (x - max_v).exp();
        sum += *d;
    }
    for d in dst.iter_mut() {
        *d /= sum;
    }
}

impl<T: Float> Matrix<T> {
    /// Elementwise logistic sigmoid.
    pub fn sigmoid(&self) -> Self {
        self.map(sigmoid)
    }

    /// `s * (1 - s)` for a matrix already passed through [`sigmoid`](Self::sigmoid).
    pub fn sigmoid_derivative(&self) -> Self {
        self.map(|s| s * (T::one() - s))
    }

    /// Elementwise hyperbolic tangent.
    pub fn tanh(&self) -> Self {
        self.map(Float::tanh)
    }

    /// `1 - t^2` for a matrix already passed through [`tanh`](Self::tanh).
    pub fn tanh_derivative(&self) -> Self {
        self.map(|t| T::one() - t * t)
    }

    /// Elementwise `max(x, 0)`.
    pub fn relu(&self) -> Self {
        self.map(|x| if x > T::zero() { x } else { T::zero() })
    }

    /// Step function for a matrix already passed through [`relu`](Self::relu).
    pub fn relu_derivative(&self) -> Self {
        self.map(|r| if r > T::zero() { T::one() } else { T::zero() })
    }

    /// Elementwise `x^n`.
    pub fn pow(&self, n: T) -> Self {
        self.map(|x| x.powf(n))
    }

    /// Divides every element by the L1 norm of the whole matrix.
    ///
    /// A matrix whose norm is zero is returned unchanged.
    pub fn l1_normalize(&self) -> Self {
        let norm = self.map(Float::abs).sum();
        self.scaled_by_inverse(norm)
    }

    /// Divides every element by the L2 norm of the whole matrix.
    ///
    /// A matrix whose norm is zero is returned unchanged.
    pub fn l2_normalize(&self) -> Self {
        let norm = self.map(|x| x * x).sum().sqrt();
        self.scaled_by_inverse(norm)
    }

    fn scaled_by_inverse(&self, norm: T) -> Self {
        if norm > T::zero() {
            self.map(|x| x / norm)
        } else {
            self.clone()
        }
    }

    /// Row-wise softmax.
    ///
    /// Each row has its own maximum subtracted before exponentiation and is
    /// normalized by its own sum, so every row of the result sums to one.
    pub fn softmax(&self) -> Self {
        let mut out = Self::zeros(self.rows, self.cols);
        if self.is_empty() {
            return out;
        }
        let cols = self.cols;
        out.data
            .par_chunks_mut(cols)
            .zip(self.data.par_chunks(cols))
            .for_each(|(dst, src)| softmax_into_slice(src, dst));
        out
    }

    /// Diagonal of the softmax Jacobian, `s * (1 - s)`, for a matrix already
    /// passed through [`softmax`](Self::softmax).
    pub fn softmax_derivative(&self) -> Self {
        self.map(|s| s * (T::one() - s))
    }

    /// Gradient of cross-entropy with respect to the logits, `self - label`.
    ///
    /// `self` must already be a softmax distribution, and `label` the
    /// one-hot or soft target of the same shape.
    pub fn softmax_cross_entropy_gradient(&self, label: &Self) -> Result<Self> {
        self.ensure_same_shape(label, "softmax_cross_entropy_gradient")?;
        let mut out = self.clone();
        out.zip_in_place(label, |o, l| o - l);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkipgramError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample() -> Matrix<f64> {
        Matrix::from_vec(2, 3, vec![-2.0, -0.5, 0.0, 0.5, 1.0, 3.0]).unwrap()
    }

    #[test]
    fn test_sigmoid_and_derivative() {
        let s = sample().sigmoid();
        assert!((s[(0, 2)] - 0.5).abs() < 1e-12);
        assert!(s.as_slice().iter().all(|&x| x > 0.0 && x < 1.0));

        let d = s.sigmoid_derivative();
        assert!((d[(0, 2)] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_tanh_and_derivative() {
        let t = sample().tanh();
        assert!((t[(1, 1)] - 1.0f64.tanh()).abs() < 1e-12);
        let d = t.tanh_derivative();
        assert!((d[(0, 2)] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_relu_and_derivative() {
        let r = sample().relu();
        assert_eq!(r.as_slice(), &[0.0, 0.0, 0.0, 0.5, 1.0, 3.0]);
        assert_eq!(r.relu_derivative().as_slice(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_pow() {
        let p = sample().pow(2.0);
        assert_eq!(p.as_slice(), &[4.0, 0.25, 0.0, 0.25, 1.0, 9.0]);
    }

    #[test]
    fn test_normalize() {
        let m = Matrix::from_vec(1, 2, vec![3.0f64, -4.0]).unwrap();
        let l2 = m.l2_normalize();
        assert!((l2[(0, 0)] - 0.6).abs() < 1e-12);
        assert!((l2[(0, 1)] + 0.8).abs() < 1e-12);

        let l1 = m.l1_normalize();
        assert!((l1[(0, 0)] - 3.0 / 7.0).abs() < 1e-12);

        let zero = Matrix::<f64>::zeros(2, 2);
        assert_eq!(zero.l2_normalize(), zero);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let mut m = Matrix::<f64>::new(512, 1024);
        m.random_init(&mut ChaCha8Rng::seed_from_u64(3));
        let s = m.softmax();
        for row in s.iter_rows() {
            let total: f64 = row.iter().sum();
            assert!((total - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_softmax_is_shift_invariant() {
        let m = Matrix::from_vec(1, 3, vec![1000.0f64, 1001.0, 1002.0]).unwrap();
        let s = m.softmax();
        assert!(s.as_slice().iter().all(|x| x.is_finite()));
        let shifted = Matrix::from_vec(1, 3, vec![0.0f64, 1.0, 2.0]).unwrap().softmax();
        for (a, b) in s.as_slice().iter().zip(shifted.as_slice()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_softmax_derivative() {
        let s = Matrix::from_vec(1, 2, vec![0.5f32, 0.5]).unwrap();
        assert_eq!(s.softmax_derivative().as_slice(), &[0.25, 0.25]);
    }

    #[test]
    fn test_cross_entropy_gradient() {
        let out = sample().softmax();
        let label = Matrix::from_vec(2, 3, vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let grad = out.softmax_cross_entropy_gradient(&label).unwrap();
        for i in 0..out.len() {
            let expected = out.as_slice()[i] - label.as_slice()[i];
            assert!((grad.as_slice()[i] - expected).abs() < 1e-10);
        }

        let wrong = Matrix::<f64>::zeros(3, 2);
        assert!(matches!(
            out.softmax_cross_entropy_gradient(&wrong),
            Err(SkipgramError::ShapeMismatch { op: "softmax_cross_entropy_gradient", .. })
        ));
    }
}
