//! Human-readable output.
//!
//! Layout:
//!
//! ```text
//! Unclassified: 12 files (3.4 MiB), 10 content groups, 2 with duplicates
//! Destination:  840 files (1.2 GiB), 799 content groups, 31 with duplicates
//!
//! Total duplicate file count = 1
//! Duplicate file size detected of size 2048 bytes! Paths include:
//! in/unclassified/a
//!  - (x.jpg)
//! in/unclassified/b
//!  - (x.jpg)
//!
//! Found unique paths:
//! in/unclassified/new.jpg
//!
//! Found duplicate paths:
//! in/unclassified/old.jpg
//!  = library/2019/old.jpg
//!
//! 1 unique file(s) in 1 group(s), 1 duplicate file(s) in 1 group(s), 3 byte comparison(s)
//! ```

use std::io::{self, Write};
use std::path::Path;

use bytesize::ByteSize;

use crate::duplicates::{ScanSummary, SizeIndex};
use crate::reconcile::ReconcileReport;

/// Text renderer for one run.
pub struct TextOutput<'r, 'a> {
    unclassified: &'r ScanSummary,
    destination: &'r ScanSummary,
    report: &'r ReconcileReport<'a>,
}

impl<'r, 'a> TextOutput<'r, 'a> {
    /// Create a renderer over both scan summaries and the reconcile report.
    #[must_use]
    pub fn new(
        unclassified: &'r ScanSummary,
        destination: &'r ScanSummary,
        report: &'r ReconcileReport<'a>,
    ) -> Self {
        Self {
            unclassified,
            destination,
            report,
        }
    }

    /// Write the full listing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_summary_line(writer, "Unclassified:", self.unclassified)?;
        write_summary_line(writer, "Destination: ", self.destination)?;
        writeln!(writer)?;

        write_duplicate_listing(writer, self.report.unclassified())?;
        self.write_unique(writer)?;
        self.write_duplicates(writer)?;

        let stats = self.report.stats();
        writeln!(
            writer,
            "{} unique file(s) in {} group(s), {} duplicate file(s) in {} group(s), {} byte comparison(s)",
            stats.unique_files,
            stats.unique_groups,
            stats.duplicate_files,
            stats.duplicate_groups,
            stats.comparisons
        )
    }

    fn write_unique<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let files = self.report.unique_files();
        if files.is_empty() {
            return Ok(());
        }

        writeln!(writer, "Found unique paths:")?;
        for file in files {
            writeln!(writer, "{}", file.path.display())?;
        }
        writeln!(writer)
    }

    fn write_duplicates<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut pairs = self.report.duplicate_pairs().peekable();
        if pairs.peek().is_none() {
            return Ok(());
        }

        writeln!(writer, "Found duplicate paths:")?;
        for (group, existing) in pairs {
            for file in group.members() {
                writeln!(writer, "{}", file.path.display())?;
            }
            for file in existing.members() {
                writeln!(writer, " = {}", file.path.display())?;
            }
        }
        writeln!(writer)
    }
}

fn write_summary_line<W: Write>(writer: &mut W, label: &str, summary: &ScanSummary) -> io::Result<()> {
    writeln!(
        writer,
        "{} {} files ({}), {} content groups, {} with duplicates",
        label,
        summary.total_files,
        ByteSize::b(summary.total_size),
        summary.groups,
        summary.duplicate_groups
    )
}

/// List the groups of `index` that hold more than one file, smallest first.
///
/// Each member is printed as its parent directory followed by
/// ` - (file name)`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_duplicate_listing<W: Write>(writer: &mut W, index: &SizeIndex) -> io::Result<()> {
    let groups = index.duplicate_groups();
    writeln!(writer, "Total duplicate file count = {}", groups.len())?;
    if groups.is_empty() {
        return writeln!(writer);
    }

    for group in groups {
        writeln!(
            writer,
            "Duplicate file size detected of size {} bytes! Paths include:",
            group.size
        )?;
        for file in group.members() {
            let parent = file.path.parent().unwrap_or_else(|| Path::new(""));
            let name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            writeln!(writer, "{}", parent.display())?;
            writeln!(writer, " - ({name})")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
