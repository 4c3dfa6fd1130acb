//! Tree scanning pipeline: walk, then group by content.
//!
//! # Overview
//!
//! [`ContentGrouper`] consumes discovered files one at a time and places
//! each into the [`SizeIndex`] group holding identical bytes. The
//! [`DuplicateFinder`] drives a [`Walker`] over one tree, feeds every file
//! to a grouper and returns the finished, immutable index with a
//! [`ScanSummary`].
//!
//! Any walk or comparison failure aborts the scan: a partially built index
//! would misreport which sizes exist in a tree.
//!
//! # Example
//!
//! ```no_run
//! use dupemerge::duplicates::{DuplicateFinder, FinderConfig};
//! use dupemerge::scanner::WalkerConfig;
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_walker_config(WalkerConfig::new([".git"], Some(512)));
//! let finder = DuplicateFinder::new(config);
//!
//! let (index, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
//! println!("{} duplicate groups", summary.duplicate_groups);
//! for group in index.duplicate_groups() {
//!     println!("{} bytes: {:?}", group.size, group.paths());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use super::groups::{Placement, SizeIndex};
use crate::progress::ProgressCallback;
use crate::scanner::{
    ByteComparator, CompareError, ContentComparator, CountingComparator, DiscoveredFile, ScanError,
    Walk, Walker, WalkerConfig,
};

/// Incremental content grouping of discovered files.
#[derive(Debug)]
pub struct ContentGrouper<C = ByteComparator> {
    comparator: CountingComparator<C>,
    index: SizeIndex,
}

impl ContentGrouper<ByteComparator> {
    /// Create a grouper that compares files byte for byte.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ByteComparator::new())
    }
}

impl<C: ContentComparator> ContentGrouper<C> {
    /// Create a grouper with a custom comparator.
    #[must_use]
    pub fn new(comparator: C) -> Self {
        Self {
            comparator: CountingComparator::new(comparator),
            index: SizeIndex::new(),
        }
    }

    /// Add one file to the index.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError`] if a comparison could not read a file.
    pub fn add_file(&mut self, file: DiscoveredFile) -> Result<Placement, CompareError> {
        self.index.insert(file, &self.comparator)
    }

    /// The index built so far.
    #[must_use]
    pub fn index(&self) -> &SizeIndex {
        &self.index
    }

    /// Number of byte comparisons made so far.
    #[must_use]
    pub fn comparisons(&self) -> u64 {
        self.comparator.count()
    }

    /// Finish grouping and hand over the index.
    #[must_use]
    pub fn finish(self) -> SizeIndex {
        self.index
    }
}

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration (ignored directory names, size filter).
    pub walker_config: WalkerConfig,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary of one tree scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Root of the scanned tree
    pub root: PathBuf,
    /// Total number of files indexed
    pub total_files: usize,
    /// Total size of all indexed files
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Number of content groups
    pub groups: usize,
    /// Number of groups with 2+ files
    pub duplicate_groups: usize,
    /// Files beyond the first in each duplicate group
    pub duplicate_files: usize,
    /// Bytes held by those extra copies
    pub reclaimable_space: u64,
    /// Byte comparisons performed while grouping
    pub comparisons: u64,
    /// Directories opened during the walk
    pub directories_scanned: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
}

impl ScanSummary {
    /// Build a summary from a finished index.
    #[must_use]
    pub fn from_index(root: &Path, index: &SizeIndex) -> Self {
        let stats = index.stats();
        Self {
            root: root.to_path_buf(),
            total_files: stats.total_files,
            total_size: stats.total_size,
            unique_sizes: stats.unique_sizes,
            groups: stats.groups,
            duplicate_groups: stats.duplicate_groups,
            duplicate_files: stats.duplicate_files,
            reclaimable_space: stats.wasted_space,
            ..Self::default()
        }
    }

    /// Reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Total size as a human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that can occur while scanning a tree.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Walking the tree failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Comparing two files failed.
    #[error(transparent)]
    Compare(#[from] CompareError),
}

/// Scans one tree into a [`SizeIndex`].
pub struct DuplicateFinder<C = ByteComparator> {
    config: FinderConfig,
    comparator: C,
}

impl DuplicateFinder<ByteComparator> {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            comparator: ByteComparator::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }
}

impl<C: ContentComparator> DuplicateFinder<C> {
    /// Create a finder with a custom comparator.
    #[must_use]
    pub fn with_comparator(config: FinderConfig, comparator: C) -> Self {
        Self { config, comparator }
    }

    /// Configuration of this finder.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Walk `path` and group every discovered file by content.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The path does not exist or is not a directory
    /// - A directory or file cannot be read during the walk
    /// - A byte comparison fails
    pub fn find_duplicates(&self, path: &Path) -> Result<(SizeIndex, ScanSummary), FinderError> {
        let start_time = Instant::now();

        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }

        let walker = Walker::new(path, self.config.walker_config.clone());
        let mut walk = walker.walk()?;
        let mut grouper = ContentGrouper::new(&self.comparator);

        let phase = path.display().to_string();
        let progress = self.config.progress_callback.as_deref();
        if let Some(cb) = progress {
            cb.on_phase_start(&phase, 0);
        }

        let grouped = Self::group_walk(&mut walk, &mut grouper, progress);

        // Clear the spinner before an error is reported.
        if let Some(cb) = progress {
            cb.on_phase_end(&phase);
        }
        grouped?;

        let comparisons = grouper.comparisons();
        let index = grouper.finish();

        let mut summary = ScanSummary::from_index(path, &index);
        summary.comparisons = comparisons;
        summary.directories_scanned = walk.dirs_visited();
        summary.scan_duration_ms = start_time.elapsed().as_millis() as u64;

        log::info!(
            "Scanned {}: {} files, {} sizes, {} groups ({} with duplicates), {} comparisons",
            path.display(),
            summary.total_files,
            summary.unique_sizes,
            summary.groups,
            summary.duplicate_groups,
            summary.comparisons
        );

        Ok((index, summary))
    }

    fn group_walk(
        walk: &mut Walk<'_>,
        grouper: &mut ContentGrouper<&C>,
        progress: Option<&dyn ProgressCallback>,
    ) -> Result<(), FinderError> {
        let mut seen = 0usize;
        for entry in walk {
            let file = entry?;
            seen += 1;
            if let Some(cb) = progress {
                cb.on_progress(seen, &file.path.to_string_lossy());
            }
            grouper.add_file(file)?;
        }
        Ok(())
    }
}
