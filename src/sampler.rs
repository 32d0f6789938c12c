//! Frequency subsampling and negative-sample draws.

use crate::vocab::Vocabulary;
use rand::Rng;

/// Subsampling and negative sampling over a fixed vocabulary.
///
/// The sampler holds no random state; every draw takes the caller's RNG so a
/// seeded generator makes the whole pipeline reproducible.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    subsample_threshold: f64,
}

impl Sampler {
    /// Creates a sampler with subsampling threshold `t`.
    pub fn new(subsample_threshold: f64) -> Self {
        Self {
            subsample_threshold,
        }
    }

    /// Retention probability `1 - sqrt(t / freq)` of an in-vocabulary word.
    ///
    /// Rare words get a negative value and are therefore always dropped.
    /// Returns 0 when the word never occurred.
    pub fn keep_probability(&self, vocab: &Vocabulary, word: &str) -> f64 {
        let freq = vocab.frequency(word);
        if freq <= 0.0 {
            return 0.0;
        }
        1.0 - (self.subsample_threshold / freq).sqrt()
    }

    /// Subsamples a corpus into index sequences.
    ///
    /// Each in-vocabulary token draws `u` in `[0, 1)`; it is appended to the
    /// current sequence when `keep_probability > u`, otherwise the current
    /// sequence is closed (pushed if non-empty) and a new one begins. A
    /// rejected token is thus also a sentence boundary. Out-of-vocabulary
    /// tokens are skipped without closing the sequence and without a draw.
    pub fn subsample<S, R>(&self, vocab: &Vocabulary, tokens: &[S], rng: &mut R) -> Vec<Vec<usize>>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut sentences = Vec::new();
        let mut current = Vec::new();

        for token in tokens {
            let word = token.as_ref();
            let Some(index) = vocab.index_of(word) else {
                continue;
            };

            let draw: f64 = rng.gen();
            if self.keep_probability(vocab, word) > draw {
                current.push(index);
            } else if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            sentences.push(current);
        }

        sentences
    }

    /// Draws `n` indices uniformly from `0..vocab_size`, with replacement,
    /// rejecting only `target`.
    ///
    /// A draw may equal the current context word. With fewer than two words
    /// no valid negative exists and the result is empty.
    pub fn negative_samples<R>(&self, target: usize, n: usize, vocab_size: usize, rng: &mut R) -> Vec<usize>
    where
        R: Rng + ?Sized,
    {
        let mut out = Vec::with_capacity(n);
        self.negative_samples_into(target, n, vocab_size, rng, &mut out);
        out
    }

    /// Like [`negative_samples`](Self::negative_samples), reusing `out`.
    pub fn negative_samples_into<R>(
        &self,
        target: usize,
        n: usize,
        vocab_size: usize,
        rng: &mut R,
        out: &mut Vec<usize>,
    ) where
        R: Rng + ?Sized,
    {
        out.clear();
        if vocab_size < 2 {
            return;
        }
        for _ in 0..n {
            let idx = loop {
                let candidate = rng.gen_range(0..vocab_size);
                if candidate != target {
                    break candidate;
                }
            };
            out.push(idx);
        }
    }
}
