//! Token normalization for corpus preprocessing.

use crate::config::TextConfig;
use unicode_normalization::UnicodeNormalization;

/// Token normalizer that applies the transformations selected in [`TextConfig`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: TextConfig,
}

impl Normalizer {
    /// Creates a new normalizer with the given configuration.
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    /// Creates a normalizer with default configuration.
    pub fn default_config() -> Self {
        Self::new(TextConfig::default())
    }

    /// Normalizes a single whitespace-delimited word.
    ///
    /// Returns `None` if nothing of the word survives filtering.
    pub fn normalize_token(&self, token: &str) -> Option<String> {
        let mut result: String = if self.config.unicode_normalize {
            token.nfc().collect()
        } else {
            token.to_string()
        };

        if self.config.alphabetic_only {
            result.retain(char::is_alphabetic);
        }

        if self.config.lowercase {
            result = result.to_lowercase();
        }

        let len = result.chars().count();
        if result.is_empty()
            || len < self.config.min_token_length
            || len > self.config.max_token_length
        {
            return None;
        }

        Some(result)
    }

    /// Normalizes text and returns all valid tokens.
    pub fn normalize_text(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter_map(|token| self.normalize_token(token))
            .collect()
    }
}
