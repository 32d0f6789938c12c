//! Cosine similarity against a pre-normalized query.

use crate::matrix::Float;
use crate::similarity::{dot, l2_norm, SimilarityMeasure};

/// Cosine similarity for a query that already has unit length.
///
/// `dot(query, candidate) / ||candidate||`, or 0 for a zero candidate. The
/// query norm is not recomputed, so ranking many candidates against one
/// query normalizes it only once.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitQueryCosine;

impl<T: Float> SimilarityMeasure<T> for UnitQueryCosine {
    fn similarity(&self, query: &[T], candidate: &[T]) -> T {
        let norm = l2_norm(candidate);
        if norm > T::zero() {
            dot(query, candidate) / norm
        } else {
            T::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::normalize_in_place;

    #[test]
    fn test_identical_direction() {
        let mut q = [0.3f64, -1.2, 4.0];
        normalize_in_place(&mut q);
        let sim = UnitQueryCosine.similarity(&q, &[0.6, -2.4, 8.0]);
        assert!((sim - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_orthogonal() {
        let sim = UnitQueryCosine.similarity(&[1.0f64, 0.0], &[0.0, 2.0]);
        assert!(sim.abs() < 1e-10);
    }

    #[test]
    fn test_opposite() {
        let sim = UnitQueryCosine.similarity(&[0.6f32, 0.8], &[-3.0, -4.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_candidate() {
        let sim = UnitQueryCosine.similarity(&[1.0f64, 0.0], &[0.0, 0.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_candidate_norm_only() {
        // An unnormalized query scales the score by its own norm.
        let sim = UnitQueryCosine.similarity(&[2.0f64, 0.0], &[5.0, 0.0]);
        assert!((sim - 2.0).abs() < 1e-12);
    }
}
