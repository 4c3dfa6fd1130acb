//! Cross-tree reconciliation.
//!
//! # Overview
//!
//! Given the finished [`SizeIndex`] of an unclassified tree and of a
//! destination tree, every unclassified group is classified:
//!
//! - **Unique** when the destination holds no file of that size. No file is
//!   opened to decide this.
//! - **Duplicate** when its representative matches the representative of a
//!   destination group of the same size.
//! - **Unique** (with a size collision) when same-size destination groups
//!   exist but none matches.
//!
//! Destination groups of one size hold pairwise distinct contents, so at
//! most one of them can match. The outcome therefore does not depend on the
//! order in which either tree was enumerated.
//!
//! Both indexes must be complete before reconciling; an absent size is read
//! as "no such file at the destination".
//!
//! # Example
//!
//! ```no_run
//! use dupemerge::duplicates::DuplicateFinder;
//! use dupemerge::reconcile::Reconciler;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (unclassified, _) = finder.find_duplicates(Path::new("input/unclassified")).unwrap();
//! let (destination, _) = finder.find_duplicates(Path::new("/library")).unwrap();
//!
//! let report = Reconciler::with_defaults().reconcile(&unclassified, &destination).unwrap();
//! for file in report.unique_files() {
//!     println!("new: {}", file.path.display());
//! }
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::duplicates::{FileGroup, GroupId, SizeIndex};
use crate::progress::{ProgressCallback, PHASE_RECONCILE};
use crate::scanner::{ByteComparator, CompareError, ContentComparator, CountingComparator, DiscoveredFile};

/// How one unclassified group relates to the destination tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// No destination file has the same content.
    Unique {
        /// Whether destination files of the same size exist.
        size_collision: bool,
    },
    /// The destination already holds this content.
    Duplicate {
        /// Destination group with the same content.
        destination: GroupId,
    },
}

impl Classification {
    /// Whether this is a duplicate classification.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Whether this is a unique classification.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        matches!(self, Self::Unique { .. })
    }
}

/// One unclassified group with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedGroup {
    /// Group in the unclassified index
    pub group: GroupId,
    /// Size of the group's files
    pub size: u64,
    /// Result
    pub classification: Classification,
}

/// Counts over a [`ReconcileReport`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Groups with no counterpart at the destination
    pub unique_groups: usize,
    /// Files in those groups
    pub unique_files: usize,
    /// Groups already present at the destination
    pub duplicate_groups: usize,
    /// Files in those groups
    pub duplicate_files: usize,
    /// Unique groups whose size also occurs at the destination
    pub size_collisions: usize,
    /// Byte comparisons performed
    pub comparisons: u64,
}

/// Errors that can occur during reconciliation.
#[derive(thiserror::Error, Debug)]
pub enum ReconcileError {
    /// Comparing an unclassified file with a destination file failed.
    #[error(transparent)]
    Compare(#[from] CompareError),
}

/// Classification of every unclassified group.
///
/// Borrows both indexes so groups can be resolved for display.
#[derive(Debug, Clone)]
pub struct ReconcileReport<'a> {
    unclassified: &'a SizeIndex,
    destination: &'a SizeIndex,
    entries: Vec<ClassifiedGroup>,
    comparisons: u64,
}

impl<'a> ReconcileReport<'a> {
    /// All classified groups, ascending by size.
    #[must_use]
    pub fn entries(&self) -> &[ClassifiedGroup] {
        &self.entries
    }

    /// The unclassified index.
    #[must_use]
    pub fn unclassified(&self) -> &'a SizeIndex {
        self.unclassified
    }

    /// The destination index.
    #[must_use]
    pub fn destination(&self) -> &'a SizeIndex {
        self.destination
    }

    /// Unclassified groups with no counterpart at the destination.
    pub fn unique_groups(&self) -> impl Iterator<Item = &'a FileGroup> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.classification.is_unique())
            .map(|entry| self.unclassified.group(entry.group))
    }

    /// Pairs of (unclassified group, matching destination group).
    pub fn duplicate_pairs(&self) -> impl Iterator<Item = (&'a FileGroup, &'a FileGroup)> + '_ {
        self.entries.iter().filter_map(|entry| match entry.classification {
            Classification::Duplicate { destination } => Some((
                self.unclassified.group(entry.group),
                self.destination.group(destination),
            )),
            Classification::Unique { .. } => None,
        })
    }

    /// Unclassified groups whose content already exists at the destination.
    pub fn duplicate_groups(&self) -> impl Iterator<Item = &'a FileGroup> + '_ {
        self.duplicate_pairs().map(|(group, _)| group)
    }

    /// Every file of every unique group.
    #[must_use]
    pub fn unique_files(&self) -> Vec<&'a DiscoveredFile> {
        self.unique_groups().flat_map(FileGroup::members).collect()
    }

    /// Every file of every duplicate group.
    #[must_use]
    pub fn duplicate_files(&self) -> Vec<&'a DiscoveredFile> {
        self.duplicate_groups().flat_map(FileGroup::members).collect()
    }

    /// Classification of the group holding `path`, if it was scanned.
    #[must_use]
    pub fn classification_of(&self, path: &Path) -> Option<Classification> {
        self.entries
            .iter()
            .find(|entry| self.unclassified.group(entry.group).contains(path))
            .map(|entry| entry.classification)
    }

    /// Paths classified unique and duplicate, as sorted sets.
    #[must_use]
    pub fn classified_paths(&self) -> (BTreeSet<PathBuf>, BTreeSet<PathBuf>) {
        let unique = self.unique_files().into_iter().map(|f| f.path.clone()).collect();
        let duplicate = self
            .duplicate_files()
            .into_iter()
            .map(|f| f.path.clone())
            .collect();
        (unique, duplicate)
    }

    /// Counts over the report.
    #[must_use]
    pub fn stats(&self) -> ReconcileStats {
        let mut stats = ReconcileStats {
            comparisons: self.comparisons,
            ..ReconcileStats::default()
        };
        for entry in &self.entries {
            let files = self.unclassified.group(entry.group).len();
            match entry.classification {
                Classification::Unique { size_collision } => {
                    stats.unique_groups += 1;
                    stats.unique_files += files;
                    if size_collision {
                        stats.size_collisions += 1;
                    }
                }
                Classification::Duplicate { .. } => {
                    stats.duplicate_groups += 1;
                    stats.duplicate_files += files;
                }
            }
        }
        stats
    }
}

/// Classifies unclassified groups against a destination index.
pub struct Reconciler<C = ByteComparator> {
    comparator: C,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl Reconciler<ByteComparator> {
    /// Create a reconciler that compares files byte for byte.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ByteComparator::new())
    }
}

impl<C: ContentComparator> Reconciler<C> {
    /// Create a reconciler with a custom comparator.
    #[must_use]
    pub fn new(comparator: C) -> Self {
        Self {
            comparator,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Classify every group of `unclassified` against `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Compare`] if a file cannot be read; no
    /// partial report is produced.
    pub fn reconcile<'a>(
        &self,
        unclassified: &'a SizeIndex,
        destination: &'a SizeIndex,
    ) -> Result<ReconcileReport<'a>, ReconcileError> {
        let comparator = CountingComparator::new(&self.comparator);
        let progress = self.progress_callback.as_deref();
        if let Some(cb) = progress {
            cb.on_phase_start(PHASE_RECONCILE, unclassified.len());
        }

        let mut entries = Vec::with_capacity(unclassified.len());
        for (size, ids) in unclassified.buckets() {
            let candidates = destination.bucket(size);
            if candidates.is_empty() {
                log::debug!("Size {size}: no destination files, {} group(s) unique", ids.len());
            }

            for &id in ids {
                let classification = if candidates.is_empty() {
                    Classification::Unique {
                        size_collision: false,
                    }
                } else {
                    classify(unclassified.group(id), destination, candidates, &comparator)?
                };

                entries.push(ClassifiedGroup {
                    group: id,
                    size,
                    classification,
                });
                if let Some(cb) = progress {
                    let path = unclassified.group(id).representative().path.to_string_lossy();
                    cb.on_progress(entries.len(), &path);
                }
            }
        }

        if let Some(cb) = progress {
            cb.on_phase_end(PHASE_RECONCILE);
        }

        Ok(ReconcileReport {
            unclassified,
            destination,
            entries,
            comparisons: comparator.count(),
        })
    }
}

/// Compare one group against the same-size destination groups.
fn classify<C: ContentComparator>(
    group: &FileGroup,
    destination: &SizeIndex,
    candidates: &[GroupId],
    comparator: &C,
) -> Result<Classification, CompareError> {
    let path = &group.representative().path;
    for &candidate in candidates {
        let other = &destination.group(candidate).representative().path;
        if comparator.same_content(path, other)? {
            log::debug!("{} already exists as {}", path.display(), other.display());
            return Ok(Classification::Duplicate {
                destination: candidate,
            });
        }
    }

    log::debug!(
        "{} is unique despite {} same-size destination group(s)",
        path.display(),
        candidates.len()
    );
    Ok(Classification::Unique {
        size_collision: true,
    })
}
