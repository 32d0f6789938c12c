//! Storage module for word-vector files and embedding persistence.

mod embeddings;
mod format;

pub use embeddings::EmbeddingSet;
pub use format::WordVectorFormat;
