//! Validation of the input and destination directories.
//!
//! The input directory must contain three subdirectories:
//!
//! - `unclassified`: files awaiting classification (may hold anything)
//! - `unique`: must exist and be empty
//! - `duplicate`: must exist and be empty
//!
//! The destination must be an existing directory. All checks run before any
//! scanning starts.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Name of the subdirectory holding files to classify.
pub const UNCLASSIFIED_DIR: &str = "unclassified";
/// Name of the subdirectory receiving unique files.
pub const UNIQUE_DIR: &str = "unique";
/// Name of the subdirectory receiving duplicate files.
pub const DUPLICATE_DIR: &str = "duplicate";

/// Validated paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLayout {
    /// The input directory given on the command line
    pub input: PathBuf,
    /// `<input>/unclassified`
    pub unclassified: PathBuf,
    /// `<input>/unique`
    pub unique: PathBuf,
    /// `<input>/duplicate`
    pub duplicate: PathBuf,
    /// The destination directory
    pub destination: PathBuf,
}

impl InputLayout {
    /// Check the input and destination paths.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if a path is not a directory, a
    /// required subdirectory is missing, or `unique` / `duplicate` is not
    /// empty. Returns [`AppError::Io`] if a subdirectory cannot be listed.
    pub fn validate(input: &Path, destination: &Path) -> Result<Self, AppError> {
        if !input.is_dir() {
            return Err(AppError::InvalidInput(format!(
                "Input path '{}' is not a directory.",
                input.display()
            )));
        }

        if !destination.is_dir() {
            return Err(AppError::InvalidInput(format!(
                "Destination path '{}' is not a directory.",
                destination.display()
            )));
        }

        let layout = Self {
            input: input.to_path_buf(),
            unclassified: required_subdirectory(input, UNCLASSIFIED_DIR, false)?,
            unique: required_subdirectory(input, UNIQUE_DIR, true)?,
            duplicate: required_subdirectory(input, DUPLICATE_DIR, true)?,
            destination: destination.to_path_buf(),
        };

        log::debug!("Validated input layout: {:?}", layout);
        Ok(layout)
    }
}

/// Resolve `parent/name` and check it is a directory, optionally empty.
fn required_subdirectory(parent: &Path, name: &str, must_be_empty: bool) -> Result<PathBuf, AppError> {
    let path = parent.join(name);

    if !path.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "Input directory '{}' is not a directory.",
            path.display()
        )));
    }

    if must_be_empty && !is_empty_dir(&path)? {
        return Err(AppError::InvalidInput(format!(
            "Input directory '{}' is not empty!",
            path.display()
        )));
    }

    Ok(path)
}

fn is_empty_dir(path: &Path) -> Result<bool, AppError> {
    let mut entries = fs::read_dir(path)
        .map_err(|e| AppError::io(format!("listing {}", path.display()), e))?;
    match entries.next() {
        None => Ok(true),
        Some(Ok(_)) => Ok(false),
        Some(Err(e)) => Err(AppError::io(format!("listing {}", path.display()), e)),
    }
}
