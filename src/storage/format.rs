//! Text format for word vectors.
//!
//! ## Format Layout
//!
//! ```text
//! <vocab_size> <embedding_dim>
//! <word_0> <x_0> <x_1> ... <x_dim-1>
//! <word_1> <x_0> <x_1> ... <x_dim-1>
//! ...
//! ```
//!
//! Fields are separated by single spaces and lines end with `\n`. Values are
//! written with Rust's shortest round-trip float formatting.

use crate::error::{Result, SkipgramError};
use crate::matrix::{Float, Matrix};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Reader/writer for the word-vector text format.
pub struct WordVectorFormat;

impl WordVectorFormat {
    /// Writes `words[i]` followed by row `i` of `vectors`, for every word.
    pub fn write<W: Write, T: Float>(writer: &mut W, words: &[String], vectors: &Matrix<T>) -> Result<()> {
        if words.len() != vectors.rows() {
            return Err(SkipgramError::shape_mismatch(
                "write_word_vectors",
                (words.len(), vectors.cols()),
                vectors.shape(),
            ));
        }

        writeln!(writer, "{} {}", words.len(), vectors.cols())?;
        for (word, row) in words.iter().zip(vectors.iter_rows()) {
            write!(writer, "{}", word)?;
            for x in row {
                write!(writer, " {}", x)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Writes the format to a file, creating or truncating it.
    pub fn write_file<P: AsRef<Path>, T: Float>(path: P, words: &[String], vectors: &Matrix<T>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write(&mut writer, words, vectors)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads words and their vectors.
    ///
    /// Fails without returning partial data if the header is malformed, a
    /// line has the wrong number of values, a value does not parse, or the
    /// stream ends before `vocab_size` word lines were read.
    pub fn read<R: BufRead, T: Float>(reader: R) -> Result<(Vec<String>, Matrix<T>)> {
        let mut lines = reader.lines();

        let header = lines
            .next()
            .ok_or_else(|| SkipgramError::InvalidFormat("missing header line".to_string()))??;
        let (vocab_size, dim) = parse_header(&header)?;

        let mut words = Vec::with_capacity(vocab_size.min(1 << 20));
        let mut data = Vec::new();

        for line_no in 0..vocab_size {
            let line = lines.next().ok_or_else(|| {
                SkipgramError::InvalidFormat(format!(
                    "expected {} word lines, found {}",
                    vocab_size, line_no
                ))
            })??;

            let mut fields = line.split_whitespace();
            let word = fields.next().ok_or_else(|| {
                SkipgramError::InvalidFormat(format!("line {}: missing word", line_no + 2))
            })?;

            let before = data.len();
            for field in fields {
                let value = field.parse::<T>().map_err(|_| {
                    SkipgramError::InvalidFormat(format!(
                        "line {}: invalid number '{}'",
                        line_no + 2,
                        field
                    ))
                })?;
                data.push(value);
            }
            if data.len() - before != dim {
                return Err(SkipgramError::InvalidFormat(format!(
                    "line {}: expected {} values for '{}', found {}",
                    line_no + 2,
                    dim,
                    word,
                    data.len() - before
                )));
            }
            words.push(word.to_string());
        }

        for line in lines {
            if !line?.trim().is_empty() {
                return Err(SkipgramError::InvalidFormat(format!(
                    "more than {} word lines",
                    vocab_size
                )));
            }
        }

        let vectors = Matrix::from_vec(vocab_size, dim, data)
            .map_err(|e| SkipgramError::InvalidFormat(e.to_string()))?;
        Ok((words, vectors))
    }

    /// Reads the format from a file.
    pub fn read_file<P: AsRef<Path>, T: Float>(path: P) -> Result<(Vec<String>, Matrix<T>)> {
        Self::read(BufReader::new(File::open(path)?))
    }
}

fn parse_header(header: &str) -> Result<(usize, usize)> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    let parsed = match fields.as_slice() {
        [v, d] => v.parse::<usize>().ok().zip(d.parse::<usize>().ok()),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SkipgramError::InvalidFormat(format!(
            "header must be '<vocab_size> <embedding_dim>', got '{}'",
            header
        ))
    })
}
