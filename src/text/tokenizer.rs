//! Corpus tokenization.

use crate::config::TextConfig;
use crate::error::Result;
use crate::text::Normalizer;
use std::io::BufRead;

/// Tokenizer that splits a corpus on whitespace and normalizes each word.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    normalizer: Normalizer,
}

impl Tokenizer {
    /// Creates a new tokenizer with the given configuration.
    pub fn new(config: TextConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config),
        }
    }

    /// Creates a tokenizer with default configuration.
    pub fn default_config() -> Self {
        Self::new(TextConfig::default())
    }

    /// Tokenizes text into normalized words, in corpus order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalizer.normalize_text(text)
    }

    /// Tokenizes a buffered stream line by line.
    ///
    /// Fails on the first read error; tokens of earlier lines are discarded.
    pub fn tokenize_reader<R: BufRead>(&self, reader: R) -> Result<Vec<String>> {
        let mut tokens = Vec::new();
        for line in reader.lines() {
            tokens.extend(self.normalizer.normalize_text(&line?));
        }
        Ok(tokens)
    }
}
