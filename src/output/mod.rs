//! Output formatters for reconciliation results.
//!
//! - [`text`]: human-readable listing
//! - [`json`]: machine-readable report for scripting
//!
//! # Example
//!
//! ```no_run
//! use dupemerge::duplicates::DuplicateFinder;
//! use dupemerge::output::TextOutput;
//! use dupemerge::reconcile::Reconciler;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (unclassified, u) = finder.find_duplicates(Path::new("in/unclassified")).unwrap();
//! let (destination, d) = finder.find_duplicates(Path::new("/library")).unwrap();
//! let report = Reconciler::with_defaults().reconcile(&unclassified, &destination).unwrap();
//!
//! TextOutput::new(&u, &d, &report).write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::{write_duplicate_listing, TextOutput};
