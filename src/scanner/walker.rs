//! Breadth-first directory walker.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and yielding the regular files it contains as [`DiscoveredFile`]
//! values. Traversal keeps an explicit queue of pending directories rather
//! than recursing, so the depth of the tree never grows the call stack.
//!
//! # Features
//!
//! - Lazy iteration: one directory handle open at a time
//! - Ignored directory names are neither entered nor enqueued
//! - Optional minimum size filter
//! - Symlinks are resolved for files, never followed into directories
//! - The first I/O failure ends the walk (no partial trees)
//!
//! # Example
//!
//! ```no_run
//! use dupemerge::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::new([".git"], Some(512));
//! let walker = Walker::new(Path::new("/home/user/Photos"), config);
//! let files: Result<Vec<_>, _> = walker.walk().unwrap().collect();
//! println!("Found {} files", files.unwrap().len());
//! ```

use std::collections::VecDeque;
use std::fs::{self, DirEntry, ReadDir};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use super::{DiscoveredFile, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configuration used by this walker.
    #[must_use]
    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Start walking the directory tree.
    ///
    /// Returns a lazy iterator over [`DiscoveredFile`] results. The iterator
    /// yields at most one error and then stops.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotADirectory`] immediately if the root is not
    /// a directory.
    pub fn walk(&self) -> Result<Walk<'_>, ScanError> {
        if !self.root.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        log::debug!("Walking {}", self.root.display());

        let mut queue = VecDeque::new();
        queue.push_back(self.root.clone());

        Ok(Walk {
            config: &self.config,
            queue,
            current: None,
            finished: false,
            dirs_visited: 0,
        })
    }
}

/// Lazy breadth-first traversal created by [`Walker::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    config: &'a WalkerConfig,
    /// Directories waiting to be read
    queue: VecDeque<PathBuf>,
    /// Directory currently being enumerated
    current: Option<(PathBuf, ReadDir)>,
    finished: bool,
    dirs_visited: usize,
}

impl Walk<'_> {
    /// Number of directories opened so far (including the root).
    #[must_use]
    pub fn dirs_visited(&self) -> usize {
        self.dirs_visited
    }

    /// Stop the walk and report the error.
    fn fail(&mut self, path: PathBuf, source: std::io::Error) -> Option<Result<DiscoveredFile, ScanError>> {
        self.finished = true;
        self.current = None;
        self.queue.clear();
        Some(Err(ScanError::Io { path, source }))
    }

    /// Classify one directory entry.
    ///
    /// Subdirectories are enqueued (unless ignored); regular files are
    /// returned if they pass the size filter.
    fn visit(&mut self, entry: &DirEntry) -> std::io::Result<Option<DiscoveredFile>> {
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            let name = entry.file_name();
            if self.config.is_ignored_dir(&name.to_string_lossy()) {
                log::trace!("Ignoring directory: {}", path.display());
            } else {
                self.queue.push_back(path);
            }
            return Ok(None);
        }

        let metadata = if file_type.is_symlink() {
            fs::metadata(&path)?
        } else {
            entry.metadata()?
        };

        if metadata.is_dir() {
            log::trace!("Not following directory symlink: {}", path.display());
            return Ok(None);
        }

        if !metadata.is_file() {
            log::trace!("Skipping special file: {}", path.display());
            return Ok(None);
        }

        let size = metadata.len();
        if !self.config.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                path.display()
            );
            return Ok(None);
        }

        Ok(Some(DiscoveredFile::new(path, size)))
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<DiscoveredFile, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            let next_entry = match self.current.as_mut() {
                Some((_, entries)) => entries.next(),
                None => {
                    let Some(dir) = self.queue.pop_front() else {
                        self.finished = true;
                        return None;
                    };
                    log::trace!("Searching directory: {}", dir.display());
                    match fs::read_dir(&dir) {
                        Ok(entries) => {
                            self.dirs_visited += 1;
                            self.current = Some((dir, entries));
                        }
                        Err(e) => return self.fail(dir, e),
                    }
                    continue;
                }
            };

            match next_entry {
                None => self.current = None,
                Some(Err(e)) => {
                    let dir = self
                        .current
                        .take()
                        .map_or_else(PathBuf::new, |(dir, _)| dir);
                    return self.fail(dir, e);
                }
                Some(Ok(entry)) => match self.visit(&entry) {
                    Ok(Some(file)) => return Some(Ok(file)),
                    Ok(None) => {}
                    Err(e) => return self.fail(entry.path(), e),
                },
            }
        }
    }
}

impl FusedIterator for Walk<'_> {}
