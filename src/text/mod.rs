//! Text processing module for corpus normalization and tokenization.

mod normalizer;
mod tokenizer;

pub use normalizer::Normalizer;
pub use tokenizer::Tokenizer;

/// Small built-in corpus used by the demo command and tests.
pub const SAMPLE_CORPUS: &str = "
    the quick brown fox jumps over the lazy dog
    the dog barks at the fox
    the fox runs through the forest
    the brown dog chases the quick fox
    machine learning is a subset of artificial intelligence
    deep learning uses neural networks for learning
    natural language processing enables computers to understand text
    word embeddings capture semantic relationships between words
    the cat sits on the mat
    the dog plays with the cat
    artificial intelligence will transform many industries
    neural networks are inspired by biological neurons
    the quick brown fox and the lazy dog are friends
    learning representations is key to modern ai
    words with similar meanings have similar vectors
";
