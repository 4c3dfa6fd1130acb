//! Chunked byte-for-byte file comparison.
//!
//! # Overview
//!
//! Two files are read in lockstep, [`CHUNK_SIZE`] bytes at a time. The
//! comparison stops at the first chunk that differs in length or content,
//! so a large file with an early difference is never read to the end.
//! No hashing is involved: a `true` result means the bytes are equal.
//!
//! Both file handles live only for the duration of one call and are closed
//! on every return path.

use std::cell::Cell;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Number of bytes read from each file per step.
pub const CHUNK_SIZE: usize = 1024;

/// Errors that can occur while comparing two files.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// A file could not be opened or read.
    #[error("I/O error comparing {path}: {source}")]
    Io {
        /// Path of the file that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Content equality check between two files.
///
/// [`ByteComparator`] is the production implementation; the grouping and
/// reconciliation code is generic over this trait.
pub trait ContentComparator {
    /// Return whether the two files hold identical bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError`] if either file cannot be read.
    fn same_content(&self, a: &Path, b: &Path) -> Result<bool, CompareError>;
}

impl<C: ContentComparator + ?Sized> ContentComparator for &C {
    fn same_content(&self, a: &Path, b: &Path) -> Result<bool, CompareError> {
        (**self).same_content(a, b)
    }
}

/// Short-circuiting chunked byte comparator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteComparator;

impl ByteComparator {
    /// Create a new comparator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ContentComparator for ByteComparator {
    fn same_content(&self, a: &Path, b: &Path) -> Result<bool, CompareError> {
        same_content(a, b)
    }
}

/// Comparator wrapper that counts how many comparisons were made.
#[derive(Debug, Default)]
pub struct CountingComparator<C> {
    inner: C,
    count: Cell<u64>,
}

impl<C> CountingComparator<C> {
    /// Wrap a comparator.
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            count: Cell::new(0),
        }
    }

    /// Comparisons made so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.get()
    }
}

impl<C: ContentComparator> ContentComparator for CountingComparator<C> {
    fn same_content(&self, a: &Path, b: &Path) -> Result<bool, CompareError> {
        self.count.set(self.count.get() + 1);
        self.inner.same_content(a, b)
    }
}

/// Compare two files byte for byte.
///
/// # Errors
///
/// Returns [`CompareError::Io`] naming the file that could not be opened or
/// read.
///
/// # Example
///
/// ```no_run
/// use dupemerge::scanner::same_content;
/// use std::path::Path;
///
/// if same_content(Path::new("a.jpg"), Path::new("b.jpg")).unwrap() {
///     println!("identical");
/// }
/// ```
pub fn same_content(a: &Path, b: &Path) -> Result<bool, CompareError> {
    let file_a = open(a)?;
    let file_b = open(b)?;

    same_reader(file_a, file_b).map_err(|e| match e {
        ReaderError::First(source) => io_error(a, source),
        ReaderError::Second(source) => io_error(b, source),
    })
}

/// Which of the two readers failed.
#[derive(Debug)]
enum ReaderError {
    First(io::Error),
    Second(io::Error),
}

/// Compare two readers chunk by chunk, stopping at the first difference.
fn same_reader<A: Read, B: Read>(mut a: A, mut b: B) -> Result<bool, ReaderError> {
    let mut buf_a = [0u8; CHUNK_SIZE];
    let mut buf_b = [0u8; CHUNK_SIZE];

    loop {
        let read_a = read_chunk(&mut a, &mut buf_a).map_err(ReaderError::First)?;
        let read_b = read_chunk(&mut b, &mut buf_b).map_err(ReaderError::Second)?;

        if read_a != read_b {
            // Callers compare sizes first; this only trips if a file changed mid-scan.
            log::debug!("Length mismatch after {} and {} bytes", read_a, read_b);
            return Ok(false);
        }

        if buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }

        if read_a == 0 {
            return Ok(true);
        }
    }
}

fn open(path: &Path) -> Result<File, CompareError> {
    File::open(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> CompareError {
    CompareError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Fill `buf` as far as the reader allows.
///
/// Returns fewer than `buf.len()` bytes only at end of file, so chunk
/// boundaries line up between two readers of equal-length files.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
