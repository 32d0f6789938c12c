//! Two-file persistence for a trained embedding set.
//!
//! A set saved under `prefix` consists of:
//!
//! - `<prefix>.vocab`: the word list and target table in the word-vector
//!   text format
//! - `<prefix>.weights`: the context table in the native binary matrix format

use crate::error::{Result, SkipgramError};
use crate::matrix::{Float, Matrix};
use crate::storage::WordVectorFormat;
use crate::vocab::Vocabulary;
use log::info;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A vocabulary with its target and context tables.
#[derive(Debug)]
pub struct EmbeddingSet<T: Float> {
    /// Word index space.
    pub vocab: Vocabulary,
    /// Target (input) embeddings, one row per word.
    pub target: Matrix<T>,
    /// Context (output) embeddings, one row per word.
    pub context: Matrix<T>,
}

impl<T: Float> EmbeddingSet<T> {
    /// Path of the text file for `prefix`.
    pub fn vocab_path<P: AsRef<Path>>(prefix: P) -> PathBuf {
        with_suffix(prefix.as_ref(), ".vocab")
    }

    /// Path of the binary file for `prefix`.
    pub fn weights_path<P: AsRef<Path>>(prefix: P) -> PathBuf {
        with_suffix(prefix.as_ref(), ".weights")
    }

    /// Saves this set under `prefix`.
    pub fn save<P: AsRef<Path>>(&self, prefix: P) -> Result<()> {
        Self::save_parts(prefix, &self.vocab, &self.target, &self.context)
    }

    /// Saves borrowed tables under `prefix` without assembling a set.
    pub fn save_parts<P: AsRef<Path>>(
        prefix: P,
        vocab: &Vocabulary,
        target: &Matrix<T>,
        context: &Matrix<T>,
    ) -> Result<()> {
        let prefix = prefix.as_ref();
        ensure_table_shape(vocab, target, context)?;

        WordVectorFormat::write_file(Self::vocab_path(prefix), vocab.words(), target)?;
        context.save_to_file(Self::weights_path(prefix))?;

        info!(
            "Saved embeddings ({} words, dim {}) to {}.{{vocab,weights}}",
            vocab.len(),
            target.cols(),
            prefix.display()
        );
        Ok(())
    }

    /// Loads a set saved under `prefix`.
    ///
    /// Both files are read completely before anything is returned. The
    /// context table must have one row per word and the same width as the
    /// target table.
    pub fn load<P: AsRef<Path>>(prefix: P) -> Result<Self> {
        let prefix = prefix.as_ref();
        let (words, target) = WordVectorFormat::read_file::<_, T>(Self::vocab_path(prefix))?;
        let context = Matrix::<T>::load_from_file(Self::weights_path(prefix))?;
        let vocab = Vocabulary::from_words(words)?;

        if context.shape() != target.shape() {
            return Err(SkipgramError::InvalidFormat(format!(
                "context table is {}x{}, expected {}x{}",
                context.rows(),
                context.cols(),
                target.rows(),
                target.cols()
            )));
        }

        info!(
            "Loaded embeddings ({} words, dim {}) from {}",
            vocab.len(),
            target.cols(),
            prefix.display()
        );
        Ok(Self {
            vocab,
            target,
            context,
        })
    }

    /// Number of columns of the tables.
    pub fn embedding_dim(&self) -> usize {
        self.target.cols()
    }
}

fn ensure_table_shape<T: Float>(vocab: &Vocabulary, target: &Matrix<T>, context: &Matrix<T>) -> Result<()> {
    if target.rows() != vocab.len() {
        return Err(SkipgramError::shape_mismatch(
            "save_embeddings",
            (vocab.len(), target.cols()),
            target.shape(),
        ));
    }
    if context.shape() != target.shape() {
        return Err(SkipgramError::shape_mismatch(
            "save_embeddings",
            target.shape(),
            context.shape(),
        ));
    }
    Ok(())
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
