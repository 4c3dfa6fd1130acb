//! Scanner module for directory traversal and byte-level file comparison.
//!
//! This module provides functionality for:
//! - Breadth-first directory walking with an explicit work queue
//! - Ignoring configured directory names (e.g. `.git`)
//! - Minimum size filtering
//! - Chunked, short-circuiting byte comparison of two files
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`comparator`]: Byte-for-byte content comparison
//!
//! # Example
//!
//! ```no_run
//! use dupemerge::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::default().with_min_size(Some(512));
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk().unwrap() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Scan failed: {}", e),
//!     }
//! }
//! ```

pub mod comparator;
pub mod walker;

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

// Re-export main types
pub use comparator::{
    same_content, ByteComparator, CompareError, ContentComparator, CountingComparator, CHUNK_SIZE,
};
pub use walker::{Walk, Walker};

/// A regular file found during a walk.
///
/// Created by the walker, consumed once by the grouper and then owned by
/// the group it joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl DiscoveredFile {
    /// Create a new DiscoveredFile.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
///
/// Built once at startup and handed to every walker by value; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Directory names skipped entirely (never enqueued).
    /// Matched against the final path component only.
    pub ignored_dir_names: BTreeSet<String>,

    /// Minimum file size to include (in bytes).
    /// Files smaller than this are silently dropped.
    pub min_size: Option<u64>,
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `ignored_dir_names` - Directory names to skip
    /// * `min_size` - Minimum file size filter
    #[must_use]
    pub fn new<I, S>(ignored_dir_names: I, min_size: Option<u64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_dir_names: ignored_dir_names.into_iter().map(Into::into).collect(),
            min_size,
        }
    }

    /// Add an ignored directory name.
    #[must_use]
    pub fn with_ignored_dir(mut self, name: impl Into<String>) -> Self {
        self.ignored_dir_names.insert(name.into());
        self
    }

    /// Set the minimum file size.
    #[must_use]
    pub fn with_min_size(mut self, min_size: Option<u64>) -> Self {
        self.min_size = min_size;
        self
    }

    /// Check whether a directory with this name is skipped.
    #[must_use]
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dir_names.contains(name)
    }

    /// Check whether a file of this size is kept.
    #[must_use]
    pub fn passes_size_filter(&self, size: u64) -> bool {
        self.min_size.map_or(true, |min| size >= min)
    }
}

/// Errors that can occur during directory scanning.
///
/// Every variant is fatal for the walk that produced it.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The walk root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while reading a directory or an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotADirectory(path) | Self::Io { path, .. } => path,
        }
    }
}
