//! JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "unclassified": { "root": "in/unclassified", "total_files": 12, "...": "..." },
//!   "destination": { "root": "/library", "total_files": 840, "...": "..." },
//!   "unclassified_duplicates": [
//!     { "size": 2048, "files": ["in/unclassified/a/x.jpg", "in/unclassified/b/x.jpg"] }
//!   ],
//!   "unique": [
//!     { "size": 600, "files": ["in/unclassified/new.jpg"] }
//!   ],
//!   "duplicates": [
//!     {
//!       "size": 700,
//!       "files": ["in/unclassified/old.jpg"],
//!       "destination_files": ["/library/2019/old.jpg"]
//!     }
//!   ],
//!   "stats": {
//!     "unique_groups": 1,
//!     "unique_files": 1,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "size_collisions": 0,
//!     "comparisons": 1
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{FileGroup, ScanSummary};
use crate::reconcile::{ReconcileReport, ReconcileStats};

/// A content group in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonGroup {
    /// File size in bytes
    pub size: u64,
    /// Paths of every file in the group
    pub files: Vec<String>,
}

impl JsonGroup {
    /// Convert a [`FileGroup`].
    #[must_use]
    pub fn from_group(group: &FileGroup) -> Self {
        Self {
            size: group.size,
            files: path_strings(group),
        }
    }
}

/// An unclassified group together with the destination files it matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonDuplicate {
    /// File size in bytes
    pub size: u64,
    /// Unclassified files with this content
    pub files: Vec<String>,
    /// Destination files with the same content
    pub destination_files: Vec<String>,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Scan summary of the unclassified tree
    pub unclassified: ScanSummary,
    /// Scan summary of the destination tree
    pub destination: ScanSummary,
    /// Groups repeated within the unclassified tree
    pub unclassified_duplicates: Vec<JsonGroup>,
    /// Groups not present at the destination
    pub unique: Vec<JsonGroup>,
    /// Groups already present at the destination
    pub duplicates: Vec<JsonDuplicate>,
    /// Reconciliation counts
    pub stats: ReconcileStats,
}

impl JsonOutput {
    /// Build the output from both scan summaries and the reconcile report.
    #[must_use]
    pub fn new(
        unclassified: &ScanSummary,
        destination: &ScanSummary,
        report: &ReconcileReport<'_>,
    ) -> Self {
        Self {
            unclassified: unclassified.clone(),
            destination: destination.clone(),
            unclassified_duplicates: report
                .unclassified()
                .duplicate_groups()
                .into_iter()
                .map(JsonGroup::from_group)
                .collect(),
            unique: report.unique_groups().map(JsonGroup::from_group).collect(),
            duplicates: report
                .duplicate_pairs()
                .map(|(group, existing)| JsonDuplicate {
                    size: group.size,
                    files: path_strings(group),
                    destination_files: path_strings(existing),
                })
                .collect(),
            stats: report.stats(),
        }
    }

    /// Serialize to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_strings(group: &FileGroup) -> Vec<String> {
    group
        .members()
        .iter()
        .map(|f| f.path.to_string_lossy().into_owned())
        .collect()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
