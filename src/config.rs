//! Configuration for the skip-gram trainer and corpus tokenizer.

use crate::error::{Result, SkipgramError};
use serde::{Deserialize, Serialize};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Skip-gram training hyper-parameters.
    pub training: TrainingConfig,

    /// Corpus tokenization configuration.
    pub text: TextConfig,
}

/// Skip-gram training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of columns of both embedding tables.
    /// Default: 100.
    pub embedding_dim: usize,

    /// Context tokens considered on each side of the target.
    /// Default: 5.
    pub window_size: usize,

    /// Negative draws per (target, context) pair.
    /// Default: 5.
    pub negative_samples: usize,

    /// SGD step size.
    /// Default: 0.025.
    pub learning_rate: f64,

    /// Passes over the subsampled sentences.
    /// Default: 10.
    pub epochs: usize,

    /// Minimum occurrence count for a word to enter the vocabulary.
    /// Default: 1.
    pub min_count: usize,

    /// Subsampling threshold `t` in `p = 1 - sqrt(t / freq)`.
    /// Default: 1e-3.
    pub subsample_threshold: f64,

    /// Contrast each pair against random negatives.
    ///
    /// When false, each pair still gets its positive update; only the
    /// negative draws are skipped (see the README's note on this flag).
    /// Default: true.
    pub use_negative_sampling: bool,

    /// Random seed for reproducibility.
    /// Default: None (random).
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            embedding_dim: crate::model::DEFAULT_EMBEDDING_DIM,
            window_size: 5,
            negative_samples: 5,
            learning_rate: 0.025,
            epochs: 10,
            min_count: 1,
            subsample_threshold: 1e-3,
            use_negative_sampling: true,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Checks that the hyper-parameters describe a trainable model.
    pub fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 {
            return Err(SkipgramError::Config(
                "embedding_dim must be greater than zero".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(SkipgramError::Config(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if !(self.subsample_threshold.is_finite() && self.subsample_threshold >= 0.0) {
            return Err(SkipgramError::Config(format!(
                "subsample_threshold must be non-negative and finite, got {}",
                self.subsample_threshold
            )));
        }
        Ok(())
    }
}

/// Corpus tokenization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// Convert all tokens to lowercase.
    /// Default: true.
    pub lowercase: bool,

    /// Keep only alphabetic characters of each whitespace-separated word.
    /// Default: true.
    pub alphabetic_only: bool,

    /// Minimum token length (in chars) to include.
    /// Default: 1.
    pub min_token_length: usize,

    /// Maximum token length (in chars) to include.
    /// Default: 100.
    pub max_token_length: usize,

    /// Apply Unicode canonical composition (NFC) before filtering.
    /// Default: false.
    pub unicode_normalize: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            alphabetic_only: true,
            min_token_length: 1,
            max_token_length: 100,
            unicode_normalize: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.training.embedding_dim, 100);
        assert_eq!(config.training.window_size, 5);
        assert_eq!(config.training.negative_samples, 5);
        assert!((config.training.learning_rate - 0.025).abs() < 1e-12);
        assert!(config.training.use_negative_sampling);
        assert!(config.text.lowercase);
    }

    #[test]
    fn test_validate() {
        assert!(TrainingConfig::default().validate().is_ok());

        let mut config = TrainingConfig::default();
        config.embedding_dim = 0;
        assert!(matches!(config.validate(), Err(SkipgramError::Config(_))));

        let mut config = TrainingConfig::default();
        config.learning_rate = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = TrainingConfig::default();
        config.subsample_threshold = -1.0;
        assert!(config.validate().is_err());
    }
}
