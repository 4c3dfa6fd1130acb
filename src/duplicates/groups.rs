//! Content groups and the size index.
//!
//! # Overview
//!
//! A [`FileGroup`] is a set of files confirmed byte-identical. The first
//! member is the group's representative: later candidates of the same size
//! are compared against it and nothing else.
//!
//! A [`SizeIndex`] owns every group found in one tree. Groups live in an
//! arena and are addressed by [`GroupId`]; a `BTreeMap` from file size to
//! the ids of that size gives candidate lookup and size-ascending reports.
//! Within a size bucket, groups keep insertion order.
//!
//! # Example
//!
//! ```no_run
//! use dupemerge::duplicates::SizeIndex;
//! use dupemerge::scanner::{ByteComparator, DiscoveredFile};
//! use std::path::PathBuf;
//!
//! let mut index = SizeIndex::new();
//! let comparator = ByteComparator::new();
//! index.insert(DiscoveredFile::new(PathBuf::from("a.txt"), 600), &comparator).unwrap();
//! index.insert(DiscoveredFile::new(PathBuf::from("b.txt"), 600), &comparator).unwrap();
//!
//! for group in index.duplicate_groups() {
//!     println!("{} bytes x {}", group.size, group.len());
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::{CompareError, ContentComparator, DiscoveredFile};

/// Handle of a group inside the [`SizeIndex`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupId(usize);

impl GroupId {
    /// Position of the group in its index's arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A set of byte-identical files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileGroup {
    /// File size in bytes (shared by all members)
    pub size: u64,
    /// Members in discovery order; never empty
    members: Vec<DiscoveredFile>,
}

impl FileGroup {
    /// Create a singleton group.
    #[must_use]
    pub fn new(file: DiscoveredFile) -> Self {
        Self {
            size: file.size,
            members: vec![file],
        }
    }

    /// Add a confirmed-identical file to this group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if file size doesn't match group size.
    pub fn add(&mut self, file: DiscoveredFile) {
        debug_assert_eq!(
            file.size, self.size,
            "File size {} doesn't match group size {}",
            file.size, self.size
        );
        self.members.push(file);
    }

    /// The canonical member used for comparisons.
    #[must_use]
    pub fn representative(&self) -> &DiscoveredFile {
        &self.members[0]
    }

    /// All members in discovery order.
    #[must_use]
    pub fn members(&self) -> &[DiscoveredFile] {
        &self.members
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check if this group is a detected duplicate set (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.members.len() > 1
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.members.len() as u64
    }

    /// Space held by the copies beyond the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Paths of all members.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.members.iter().map(|f| f.path.clone()).collect()
    }

    /// Check whether a path belongs to this group.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.members.iter().any(|f| f.path == path)
    }
}

/// Outcome of inserting one file into a [`SizeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The size had no bucket yet; a new bucket and group were created.
    NewSize(GroupId),
    /// The file matched no existing group of its size.
    NewGroup(GroupId),
    /// The file joined an existing group.
    Joined(GroupId),
}

impl Placement {
    /// Group that now holds the file.
    #[must_use]
    pub fn group(self) -> GroupId {
        match self {
            Self::NewSize(id) | Self::NewGroup(id) | Self::Joined(id) => id,
        }
    }
}

/// All groups discovered in one tree, partitioned by size.
#[derive(Debug, Clone, Default)]
pub struct SizeIndex {
    groups: Vec<FileGroup>,
    by_size: BTreeMap<u64, Vec<GroupId>>,
}

impl SizeIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a file in the group holding its content.
    ///
    /// Looks up the file's size bucket and compares the file against each
    /// group's representative in order. The first match absorbs the file and
    /// no further representatives are consulted. If nothing matches, a new
    /// singleton group is appended to the bucket.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError`] if a comparison fails to read either file;
    /// the index is left unchanged in that case.
    pub fn insert<C>(&mut self, file: DiscoveredFile, comparator: &C) -> Result<Placement, CompareError>
    where
        C: ContentComparator + ?Sized,
    {
        let Some(bucket) = self.by_size.get(&file.size) else {
            let id = self.push_group(file);
            return Ok(Placement::NewSize(id));
        };

        let mut matched = None;
        for &id in bucket {
            let representative = &self.groups[id.0].representative().path;
            if comparator.same_content(&file.path, representative)? {
                matched = Some(id);
                break;
            }
        }

        match matched {
            Some(id) => {
                log::trace!(
                    "{} joins group of {}",
                    file.path.display(),
                    self.groups[id.0].representative().path.display()
                );
                self.groups[id.0].add(file);
                Ok(Placement::Joined(id))
            }
            None => {
                let id = self.push_group(file);
                Ok(Placement::NewGroup(id))
            }
        }
    }

    fn push_group(&mut self, file: DiscoveredFile) -> GroupId {
        let id = GroupId(self.groups.len());
        self.by_size.entry(file.size).or_default().push(id);
        self.groups.push(FileGroup::new(file));
        id
    }

    /// Look up a group by id.
    ///
    /// # Panics
    ///
    /// Panics if the id was issued by a different index.
    #[must_use]
    pub fn group(&self, id: GroupId) -> &FileGroup {
        &self.groups[id.0]
    }

    /// Look up a group by id, returning `None` for foreign ids.
    #[must_use]
    pub fn get(&self, id: GroupId) -> Option<&FileGroup> {
        self.groups.get(id.0)
    }

    /// Whether any file of this size was indexed.
    #[must_use]
    pub fn contains_size(&self, size: u64) -> bool {
        self.by_size.contains_key(&size)
    }

    /// Group ids of one size bucket, in insertion order.
    #[must_use]
    pub fn bucket(&self, size: u64) -> &[GroupId] {
        self.by_size.get(&size).map_or(&[], Vec::as_slice)
    }

    /// Iterate size buckets in ascending size order.
    pub fn buckets(&self) -> impl Iterator<Item = (u64, &[GroupId])> + '_ {
        self.by_size.iter().map(|(size, ids)| (*size, ids.as_slice()))
    }

    /// Iterate all groups in ascending size order (insertion order within a size).
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &FileGroup)> + '_ {
        self.by_size
            .values()
            .flatten()
            .map(move |&id| (id, &self.groups[id.0]))
    }

    /// Groups with more than one member, ascending by size.
    #[must_use]
    pub fn duplicate_groups(&self) -> Vec<&FileGroup> {
        self.iter()
            .map(|(_, group)| group)
            .filter(|group| group.has_duplicates())
            .collect()
    }

    /// Number of distinct sizes.
    #[must_use]
    pub fn size_count(&self) -> usize {
        self.by_size.len()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no file was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of indexed files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(FileGroup::len).sum()
    }

    /// Statistics over the whole index.
    #[must_use]
    pub fn stats(&self) -> GroupingStats {
        let mut stats = GroupingStats {
            unique_sizes: self.by_size.len(),
            groups: self.groups.len(),
            ..GroupingStats::default()
        };
        for group in &self.groups {
            stats.total_files += group.len();
            stats.total_size += group.total_size();
            if group.has_duplicates() {
                stats.duplicate_groups += 1;
                stats.duplicate_files += group.duplicate_count();
                stats.wasted_space += group.wasted_space();
            }
        }
        stats
    }
}

/// Statistics over a [`SizeIndex`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Total number of files indexed
    pub total_files: usize,
    /// Total size of all files in bytes
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
    pub wasted_space: u64,
}
