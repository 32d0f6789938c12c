//! Error types for the skipgram matrix engine and embedding trainer.

use thiserror::Error;

/// The main error type for skipgram operations.
#[derive(Error, Debug)]
pub enum SkipgramError {
    /// Two operands of a matrix operation have incompatible dimensions.
    #[error("Shape mismatch in {op}: expected {}x{}, got {}x{}", expected.0, expected.1, got.0, got.1)]
    ShapeMismatch {
        /// Name of the operation that rejected its operands.
        op: &'static str,
        /// Shape required by the left operand.
        expected: (usize, usize),
        /// Shape of the offending operand.
        got: (usize, usize),
    },

    /// An operation that needs a non-empty matrix received an empty one.
    #[error("Zero-sized matrix in {op}")]
    ZeroSize {
        /// Name of the operation.
        op: &'static str,
    },

    /// Embeddings were requested before a vocabulary was built.
    #[error("Vocabulary not built: call prepare_training_data() first")]
    VocabularyNotBuilt,

    /// Embedding tables were used before they were created or loaded.
    #[error("Embeddings not initialized: call initialize_embeddings() or load_embeddings() first")]
    EmbeddingsNotInitialized,

    /// Word lookup miss.
    #[error("Word not in vocabulary: {0}")]
    WordNotInVocabulary(String),

    /// I/O error, including truncated streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file was readable but its contents are malformed.
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SkipgramError {
    /// Returns true for failures raised while reading or writing files.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, SkipgramError::Io(_) | SkipgramError::InvalidFormat(_))
    }

    pub(crate) fn shape_mismatch(
        op: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    ) -> Self {
        SkipgramError::ShapeMismatch { op, expected, got }
    }
}

/// Result type alias for skipgram operations.
pub type Result<T> = std::result::Result<T, SkipgramError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = SkipgramError::shape_mismatch("add", (2, 3), (3, 2));
        let msg = err.to_string();
        assert!(msg.contains("add"));
        assert!(msg.contains("2x3"));
        assert!(msg.contains("3x2"));
    }

    #[test]
    fn test_io_failure_classification() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        assert!(SkipgramError::from(eof).is_io_failure());
        assert!(SkipgramError::InvalidFormat("bad header".into()).is_io_failure());
        assert!(!SkipgramError::VocabularyNotBuilt.is_io_failure());
    }
}
