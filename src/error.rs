//! Structured error handling and exit codes.

use std::path::PathBuf;

use serde::Serialize;

use crate::duplicates::FinderError;
use crate::reconcile::ReconcileError;
use crate::scanner::{CompareError, ScanError};

/// Exit codes for the DupeMerge application.
///
/// - 0: Success (completed normally, or the user declined `--apply`)
/// - 1: Failure (invalid arguments or paths, or an I/O failure while scanning)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: completed, or aborted at the confirmation prompt.
    Success = 0,
    /// Failure: any error.
    Failure = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DM000",
            Self::Failure => "DM001",
        }
    }
}

/// Top-level error taxonomy.
///
/// Every variant is terminal; nothing is retried.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Wrong argument count or an unexpected token.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A path is missing, not a directory, or not empty when it must be.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A directory or file could not be read during the scan.
    #[error("I/O failure while {context}: {source}")]
    Io {
        /// What the program was doing
        context: String,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl AppError {
    /// Machine-readable kind tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidInput(_) => "invalid_input",
            Self::Io { .. } => "io_failure",
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::Failure
    }

    /// Wrap an I/O-class error with context.
    pub fn io(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self::Io {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Classify a tree scan failure.
    #[must_use]
    pub fn from_scan(root: &std::path::Path, err: FinderError) -> Self {
        match err {
            FinderError::PathNotFound(path) => {
                Self::InvalidInput(format!("Path '{}' does not exist.", path.display()))
            }
            FinderError::NotADirectory(path) | FinderError::Scan(ScanError::NotADirectory(path)) => {
                Self::InvalidInput(format!("Path '{}' is not a directory.", path.display()))
            }
            other => Self::io(format!("scanning {}", root.display()), other),
        }
    }
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        Self::io("reconciling against the destination", err)
    }
}

impl From<CompareError> for AppError {
    fn from(err: CompareError) -> Self {
        Self::io("comparing files", err)
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DM001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Error kind (`invalid_argument`, `invalid_input`, `io_failure`, `unknown`)
    pub kind: String,
    /// Human-readable error message
    pub message: String,
    /// Path the error refers to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let app_error = err.downcast_ref::<AppError>();
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            kind: app_error.map_or("unknown", AppError::kind).to_string(),
            message: err.to_string(),
            path: err.chain().find_map(error_path),
        }
    }
}

/// Path carried by a scan or comparison error in the cause chain.
fn error_path(cause: &(dyn std::error::Error + 'static)) -> Option<PathBuf> {
    let compare_path = |err: &CompareError| match err {
        CompareError::Io { path, .. } => path.clone(),
    };

    if let Some(scan) = cause.downcast_ref::<ScanError>() {
        return Some(scan.path().to_path_buf());
    }
    if let Some(compare) = cause.downcast_ref::<CompareError>() {
        return Some(compare_path(compare));
    }
    if let Some(finder) = cause.downcast_ref::<FinderError>() {
        return match finder {
            FinderError::PathNotFound(path) | FinderError::NotADirectory(path) => Some(path.clone()),
            FinderError::Scan(scan) => Some(scan.path().to_path_buf()),
            FinderError::Compare(compare) => Some(compare_path(compare)),
        };
    }
    if let Some(ReconcileError::Compare(compare)) = cause.downcast_ref::<ReconcileError>() {
        return Some(compare_path(compare));
    }
    None
}
