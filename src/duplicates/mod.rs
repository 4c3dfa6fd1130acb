//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Content groups addressed by handle within a size index
//! - Incremental grouping of discovered files (size lookup, then byte comparison)
//! - Scanning a whole tree into an immutable index

pub mod finder;
pub mod groups;

pub use finder::{ContentGrouper, DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{FileGroup, GroupId, GroupingStats, Placement, SizeIndex};
