//! Skip-gram embedding model.
//!
//! [`Word2Vec`] owns the whole pipeline: corpus tokens, vocabulary,
//! subsampled sentences and the two embedding tables. Training is online
//! SGD with negative sampling and reports one [`EpochReport`] per pass.

mod report;
mod trainer;

pub use report::EpochReport;
pub use trainer::{Word2Vec, DEFAULT_EMBEDDING_DIM};
