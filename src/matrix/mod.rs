//! Dense numeric matrix engine.
//!
//! - [`Matrix`]: owned row-major container with checked row/element access
//! - Elementwise arithmetic, transpose and reductions (ops.rs)
//! - Cache-blocked, rayon-parallel multiplication (gemm.rs)
//! - Activations, normalization and softmax (activation.rs)
//! - Native binary save/load (io.rs)

mod activation;
mod dense;
mod element;
pub mod gemm;
mod io;
mod ops;

pub use activation::sigmoid;
pub use dense::{Matrix, PARALLEL_THRESHOLD};
pub use element::Float;
pub use gemm::{BlockIterator, BLOCK_SIZE};
