//! Binary persistence for matrices.
//!
//! ## Format Layout
//!
//! ```text
//! +----------------------+
//! | rows (u64)           |
//! +----------------------+
//! | cols (u64)           |
//! +----------------------+
//! | rows * cols elements |
//! +----------------------+
//! ```
//!
//! Integers and elements use the host's native byte order and the element's
//! native width. There is no magic number or version, so files are only
//! portable between hosts with the same endianness and element type.

use crate::error::{Result, SkipgramError};
use crate::matrix::{Float, Matrix};
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Elements encoded or decoded per I/O call.
const IO_CHUNK: usize = 1 << 16;

impl<T: Float> Matrix<T> {
    /// Writes the matrix in the binary format.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&(self.rows as u64).to_ne_bytes())?;
        writer.write_all(&(self.cols as u64).to_ne_bytes())?;

        let mut buf = Vec::with_capacity(IO_CHUNK.min(self.data.len()) * T::BYTES);
        for chunk in self.data.chunks(IO_CHUNK) {
            buf.clear();
            for &x in chunk {
                x.write_ne_bytes(&mut buf);
            }
            writer.write_all(&buf)?;
        }
        Ok(())
    }

    /// Reads a matrix in the binary format.
    ///
    /// A short stream fails with an `Io` error of kind `UnexpectedEof`;
    /// no partially filled matrix is ever returned.
    pub fn load<R: Read>(reader: &mut R) -> Result<Self> {
        let rows = read_u64(reader)?;
        let cols = read_u64(reader)?;

        let (rows, cols) = match (usize::try_from(rows), usize::try_from(cols)) {
            (Ok(r), Ok(c)) => (r, c),
            _ => {
                return Err(SkipgramError::InvalidFormat(format!(
                    "matrix dimensions {}x{} do not fit in memory",
                    rows, cols
                )))
            }
        };
        if rows == 0 || cols == 0 {
            return Ok(Self::empty());
        }
        let total = rows.checked_mul(cols).ok_or_else(|| {
            SkipgramError::InvalidFormat(format!("matrix dimensions {}x{} overflow", rows, cols))
        })?;

        // Grow as data arrives so a corrupt header cannot force a huge allocation.
        let mut data = Vec::with_capacity(total.min(IO_CHUNK));
        let mut buf = vec![0u8; total.min(IO_CHUNK) * T::BYTES];
        let mut remaining = total;
        while remaining > 0 {
            let n = remaining.min(IO_CHUNK);
            let bytes = &mut buf[..n * T::BYTES];
            reader.read_exact(bytes)?;
            data.extend(bytes.chunks_exact(T::BYTES).map(T::read_ne_bytes));
            remaining -= n;
        }

        Ok(Self { rows, cols, data })
    }

    /// Saves the matrix to a file, creating or truncating it.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        debug!("Saved {}x{} matrix to {}", self.rows, self.cols, path.display());
        Ok(())
    }

    /// Loads a matrix from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let m = Self::load(&mut reader)?;
        debug!("Loaded {}x{} matrix from {}", m.rows, m.cols, path.display());
        Ok(m)
    }
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(u64::from_ne_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_layout() {
        let m = Matrix::from_vec(1, 2, vec![1.5f32, -2.0]).unwrap();
        let mut bytes = Vec::new();
        m.save(&mut bytes).unwrap();

        assert_eq!(bytes.len(), 8 + 8 + 2 * 4);
        assert_eq!(&bytes[0..8], &1u64.to_ne_bytes());
        assert_eq!(&bytes[8..16], &2u64.to_ne_bytes());
        assert_eq!(&bytes[16..20], &1.5f32.to_ne_bytes());
        assert_eq!(&bytes[20..24], &(-2.0f32).to_ne_bytes());
    }

    #[test]
    fn test_save_load_bit_identical() {
        let mut m = Matrix::<f64>::new(37, 300);
        m.random_uniform(&mut ChaCha8Rng::seed_from_u64(4), -1.0, 1.0);

        let mut bytes = Vec::new();
        m.save(&mut bytes).unwrap();
        let loaded = Matrix::<f64>::load(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(loaded.shape(), m.shape());
        for (a, b) in loaded.as_slice().iter().zip(m.as_slice()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_empty_roundtrip() {
        let mut bytes = Vec::new();
        Matrix::<f32>::empty().save(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 16);
        assert!(Matrix::<f32>::load(&mut Cursor::new(bytes)).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_fails() {
        let m = Matrix::filled(4, 4, 1.0f32);
        let mut bytes = Vec::new();
        m.save(&mut bytes).unwrap();
        bytes.truncate(bytes.len() - 3);

        let err = Matrix::<f32>::load(&mut Cursor::new(bytes)).unwrap_err();
        match err {
            SkipgramError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error: {:?}", other),
        }

        let header_only = 5u64.to_ne_bytes();
        assert!(Matrix::<f32>::load(&mut Cursor::new(&header_only[..])).is_err());
    }

    #[test]
    fn test_overflowing_header_fails() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&u64::MAX.to_ne_bytes());
        bytes.extend_from_slice(&u64::MAX.to_ne_bytes());
        let err = Matrix::<f64>::load(&mut Cursor::new(bytes)).unwrap_err();
        assert!(err.is_io_failure());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.bin");

        let m = Matrix::from_fn(3, 5, |i, j| (i * 5 + j) as f32 * 0.1);
        m.save_to_file(&path).unwrap();
        assert_eq!(Matrix::<f32>::load_from_file(&path).unwrap(), m);

        assert!(Matrix::<f32>::load_from_file(dir.path().join("missing.bin")).is_err());
    }
}
