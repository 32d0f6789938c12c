//! Similarity measures and nearest-neighbour ranking for embedding vectors.

mod cosine;

pub use cosine::UnitQueryCosine;

use crate::matrix::Float;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Trait for similarity measures between dense vectors.
pub trait SimilarityMeasure<T: Float> {
    /// Computes the similarity of `candidate` to `query`; higher is closer.
    fn similarity(&self, query: &[T], candidate: &[T]) -> T;
}

/// Inner product of two vectors.
#[inline]
pub fn dot<T: Float>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| x * y).sum()
}

/// Euclidean norm of a vector.
#[inline]
pub fn l2_norm<T: Float>(v: &[T]) -> T {
    dot(v, v).sqrt()
}

/// Scales `v` to unit length in place; a zero vector is left unchanged.
pub fn normalize_in_place<T: Float>(v: &mut [T]) {
    let norm = l2_norm(v);
    if norm > T::zero() {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Scores every row of `rows` against `query` with `measure` and keeps the
/// `top_n` best.
///
/// Rows for which `skip` returns true are ignored. Results are sorted by
/// descending score; equal scores keep ascending row order.
pub fn rank_by_similarity<'a, T, M, I, F>(
    measure: &M,
    query: &[T],
    rows: I,
    top_n: usize,
    skip: F,
) -> Vec<(usize, T)>
where
    T: Float,
    M: SimilarityMeasure<T> + Sync,
    I: IndexedParallelIterator<Item = &'a [T]>,
    F: Fn(usize) -> bool + Sync + Send,
{
    if top_n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, T)> = rows
        .enumerate()
        .filter(|(idx, _)| !skip(*idx))
        .map(|(idx, row)| (idx, measure.similarity(query, row)))
        .collect();

    // Stable sort: ties stay in row order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(top_n);
    scored
}
