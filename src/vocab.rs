//! Vocabulary construction.
//!
//! A [`Vocabulary`] maps every word that meets the minimum count to a dense
//! index in `0..len()`. Indices are assigned in first-encounter order over the
//! corpus, so the same corpus always yields the same index space.

use crate::error::{Result, SkipgramError};
use log::info;
use std::collections::HashMap;

/// Word index space and frequency table built from a token corpus.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    word_to_index: HashMap<String, usize>,
    index_to_word: Vec<String>,
    word_counts: HashMap<String, usize>,
    total_words: usize,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vocabulary from a corpus.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S], min_count: usize) -> Self {
        let mut vocab = Self::new();
        vocab.build(tokens, min_count);
        vocab
    }

    /// Rebuilds the vocabulary from a corpus, discarding any prior state.
    ///
    /// Every token is counted. Tokens occurring fewer than `min_count` times
    /// stay in the count table but get no index.
    pub fn build<S: AsRef<str>>(&mut self, tokens: &[S], min_count: usize) {
        self.word_to_index.clear();
        self.index_to_word.clear();
        self.word_counts.clear();
        self.total_words = tokens.len();

        for token in tokens {
            *self.word_counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
        }

        for token in tokens {
            let word = token.as_ref();
            if self.word_counts[word] >= min_count && !self.word_to_index.contains_key(word) {
                self.word_to_index.insert(word.to_string(), self.index_to_word.len());
                self.index_to_word.push(word.to_string());
            }
        }

        info!(
            "Built vocabulary: {} words kept of {} distinct ({} tokens, min_count={})",
            self.index_to_word.len(),
            self.word_counts.len(),
            self.total_words,
            min_count
        );
    }

    /// Builds an index space from an ordered word list, with no count data.
    ///
    /// Used when loading saved embeddings. Fails on duplicate words.
    pub fn from_words(words: Vec<String>) -> Result<Self> {
        let mut word_to_index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if word_to_index.insert(word.clone(), i).is_some() {
                return Err(SkipgramError::InvalidFormat(format!(
                    "duplicate vocabulary word: {}",
                    word
                )));
            }
        }
        Ok(Self {
            word_to_index,
            index_to_word: words,
            word_counts: HashMap::new(),
            total_words: 0,
        })
    }

    /// Index of `word`, if it is in the vocabulary.
    #[inline]
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.word_to_index.get(word).copied()
    }

    /// Word at `index`.
    #[inline]
    pub fn word(&self, index: usize) -> Option<&str> {
        self.index_to_word.get(index).map(String::as_str)
    }

    /// Checks if a word has an index.
    pub fn contains(&self, word: &str) -> bool {
        self.word_to_index.contains_key(word)
    }

    /// Occurrences of `word` in the corpus, including excluded words.
    pub fn count(&self, word: &str) -> usize {
        self.word_counts.get(word).copied().unwrap_or(0)
    }

    /// `count(word) / total_words`, or 0 for an empty corpus.
    pub fn frequency(&self, word: &str) -> f64 {
        if self.total_words == 0 {
            return 0.0;
        }
        self.count(word) as f64 / self.total_words as f64
    }

    /// Words in index order.
    pub fn words(&self) -> &[String] {
        &self.index_to_word
    }

    /// Number of indexed words (`vocab_size`).
    pub fn len(&self) -> usize {
        self.index_to_word.len()
    }

    /// Checks if no word has an index.
    pub fn is_empty(&self) -> bool {
        self.index_to_word.is_empty()
    }

    /// Number of tokens in the corpus the vocabulary was built from.
    pub fn total_words(&self) -> usize {
        self.total_words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_first_encounter_order() {
        let vocab = Vocabulary::from_tokens(&tokens("the fox the dog fox cat"), 1);
        assert_eq!(vocab.words(), &["the", "fox", "dog", "cat"]);
        assert_eq!(vocab.index_of("dog"), Some(2));
        assert_eq!(vocab.word(3), Some("cat"));
        assert_eq!(vocab.total_words(), 6);
    }

    #[test]
    fn test_min_count_threshold() {
        let vocab = Vocabulary::from_tokens(&["the", "the", "fox", "fox", "fox"], 2);
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains("the"));
        assert!(vocab.contains("fox"));

        let vocab = Vocabulary::from_tokens(&tokens("the the fox fox fox dog"), 2);
        assert_eq!(vocab.len(), 2);
        assert!(!vocab.words().iter().any(|w| w == "dog"));
        // Excluded words keep their counts.
        assert_eq!(vocab.count("dog"), 1);
        assert!((vocab.frequency("fox") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_index_invariant() {
        let vocab = Vocabulary::from_tokens(&tokens("a b c a b a d e e"), 1);
        for (i, word) in vocab.words().iter().enumerate() {
            assert_eq!(vocab.index_of(word), Some(i));
        }
    }

    #[test]
    fn test_rebuild_clears_and_is_idempotent() {
        let corpus = tokens("one two two three");
        let mut vocab = Vocabulary::from_tokens(&tokens("zebra yak"), 1);
        vocab.build(&corpus, 1);
        let first = vocab.words().to_vec();
        vocab.build(&corpus, 1);

        assert_eq!(vocab.words(), first.as_slice());
        assert!(!vocab.contains("zebra"));
        assert_eq!(vocab.count("zebra"), 0);
        assert_eq!(vocab.count("two"), 2);
    }

    #[test]
    fn test_from_words_rejects_duplicates() {
        let vocab = Vocabulary::from_words(tokens("x y z")).unwrap();
        assert_eq!(vocab.index_of("z"), Some(2));
        assert!(Vocabulary::from_words(tokens("x y x")).is_err());
    }

    #[test]
    fn test_empty() {
        let vocab = Vocabulary::from_tokens::<String>(&[], 1);
        assert!(vocab.is_empty());
        assert_eq!(vocab.frequency("anything"), 0.0);
    }
}
