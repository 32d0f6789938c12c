//! Floating-point element types usable in a [`Matrix`](super::Matrix).

use rand::distributions::uniform::SampleUniform;
use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Trait for the scalar types a matrix can hold.
///
/// Implemented for `f32` and `f64` only, so a matrix of integers is rejected
/// at compile time.
pub trait Float:
    Copy
    + Send
    + Sync
    + Debug
    + Display
    + PartialOrd
    + Default
    + FromStr
    + Sum
    + SampleUniform
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + 'static
{
    /// Width of one element in the binary matrix format.
    const BYTES: usize;

    /// Additive identity.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// Lossy conversion from `f64`.
    fn from_f64(value: f64) -> Self;

    /// Widening conversion to `f64`.
    fn to_f64(self) -> f64;

    /// Negative infinity.
    fn neg_infinity() -> Self;

    /// `e^self`.
    fn exp(self) -> Self;

    /// Natural logarithm.
    fn ln(self) -> Self;

    /// Square root.
    fn sqrt(self) -> Self;

    /// Hyperbolic tangent.
    fn tanh(self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// `self` raised to a floating-point power.
    fn powf(self, n: Self) -> Self;

    /// Larger of two values, ignoring NaN.
    fn max(self, other: Self) -> Self;

    /// Appends the native-endian bytes of `self` to `out`.
    fn write_ne_bytes(self, out: &mut Vec<u8>);

    /// Decodes one element from exactly [`Self::BYTES`] native-endian bytes.
    fn read_ne_bytes(bytes: &[u8]) -> Self;
}

macro_rules! impl_float {
    ($($t:ty),*) => {
        $(
            impl Float for $t {
                const BYTES: usize = std::mem::size_of::<$t>();

                #[inline(always)]
                fn zero() -> Self {
                    0.0
                }

                #[inline(always)]
                fn one() -> Self {
                    1.0
                }

                #[inline(always)]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                #[inline(always)]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline(always)]
                fn neg_infinity() -> Self {
                    <$t>::NEG_INFINITY
                }

                #[inline(always)]
                fn exp(self) -> Self {
                    <$t>::exp(self)
                }

                #[inline(always)]
                fn ln(self) -> Self {
                    <$t>::ln(self)
                }

                #[inline(always)]
                fn sqrt(self) -> Self {
                    <$t>::sqrt(self)
                }

                #[inline(always)]
                fn tanh(self) -> Self {
                    <$t>::tanh(self)
                }

                #[inline(always)]
                fn abs(self) -> Self {
                    <$t>::abs(self)
                }

                #[inline(always)]
                fn powf(self, n: Self) -> Self {
                    <$t>::powf(self, n)
                }

                #[inline(always)]
                fn max(self, other: Self) -> Self {
                    <$t>::max(self, other)
                }

                #[inline]
                fn write_ne_bytes(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }

                #[inline]
                fn read_ne_bytes(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(&bytes[..Self::BYTES]);
                    <$t>::from_ne_bytes(buf)
                }
            }
        )*
    };
}

impl_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(<f32 as Float>::BYTES, 4);
        assert_eq!(<f64 as Float>::BYTES, 8);
    }

    #[test]
    fn test_byte_codec() {
        let mut buf = Vec::new();
        (-1.25f32).write_ne_bytes(&mut buf);
        assert_eq!(buf.len(), 4);
        assert_eq!(<f32 as Float>::read_ne_bytes(&buf), -1.25);
    }

    #[test]
    fn test_max_ignores_nan() {
        assert_eq!(Float::max(f64::NAN, 2.0), 2.0);
    }
}
