//! # Skipgram - Dense Matrices and Word Embeddings
//!
//! Skipgram is a Rust implementation of a dense, row-major matrix engine and a
//! skip-gram word-embedding trainer built on top of it.
//!
//! ## Overview
//!
//! Words are mapped to dense vectors by contrasting real (target, context)
//! co-occurrences against randomly drawn negative pairs. Words that share
//! contexts end up close in cosine similarity.
//!
//! ## Key Features
//!
//! - **Generic [`Matrix`]** over `f32`/`f64` with checked shapes
//! - **Cache-blocked multiplication** parallelized across row bands with rayon
//! - **Activations** (sigmoid, tanh, ReLU) and a numerically stable softmax
//! - **Skip-gram training** with frequency subsampling and negative sampling
//! - **Persistence** in a plain word-vector text format and a native binary
//!   matrix format
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skipgram::{TrainingConfig, Word2Vec};
//!
//! let config = TrainingConfig {
//!     seed: Some(42),
//!     ..TrainingConfig::default()
//! };
//! let mut model = Word2Vec::<f32>::new(config)?;
//! model.load_corpus_from_file("corpus.txt")?;
//! model.prepare_training_data();
//! model.train()?;
//!
//! for (word, score) in model.most_similar("king", 10)? {
//!     println!("{} {:.4}", word, score);
//! }
//! model.save_embeddings("king_model")?;
//! ```
//!
//! ## Architecture
//!
//! - [`matrix`] - Dense matrix engine
//! - [`text`] - Corpus tokenization
//! - [`vocab`] - Vocabulary construction
//! - [`sampler`] - Subsampling and negative sampling
//! - [`model`] - Skip-gram trainer
//! - [`similarity`] - Vector similarity and ranking
//! - [`storage`] - Word-vector files and embedding persistence

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::needless_return)]

pub mod config;
pub mod error;
pub mod matrix;
pub mod model;
pub mod sampler;
pub mod similarity;
pub mod storage;
pub mod text;
pub mod vocab;

// Re-export commonly used types
pub use config::{Config, TextConfig, TrainingConfig};
pub use error::{Result, SkipgramError};
pub use matrix::{Float, Matrix};
pub use model::{EpochReport, Word2Vec, DEFAULT_EMBEDDING_DIM};
pub use sampler::Sampler;
pub use similarity::{SimilarityMeasure, UnitQueryCosine};
pub use storage::{EmbeddingSet, WordVectorFormat};
pub use text::{Normalizer, Tokenizer, SAMPLE_CORPUS};
pub use vocab::Vocabulary;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
