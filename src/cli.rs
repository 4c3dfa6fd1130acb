//! Command-line interface definitions for DupeMerge.
//!
//! The command takes exactly two positional paths and an optional `--apply`
//! flag, plus the usual verbosity, output and filtering options.
//!
//! # Example
//!
//! ```bash
//! # Classify ~/incoming/unclassified against the ~/photos library
//! dupemerge ~/incoming ~/photos
//!
//! # Same, as JSON for scripting
//! dupemerge ~/incoming ~/photos --output json
//!
//! # Include small files, skip node_modules as well as .git
//! dupemerge ~/incoming ~/photos --no-min-size --ignore-dir node_modules
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find files in an unclassified folder that already exist in a destination tree.
///
/// The input directory must contain `unclassified`, plus empty `unique` and
/// `duplicate` subdirectories. Every file under `unclassified` is compared
/// byte for byte against the destination and reported as unique or duplicate.
#[derive(Debug, Parser)]
#[command(name = "dupemerge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing unclassified/, unique/ and duplicate/
    #[arg(value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// Directory tree to compare against
    #[arg(value_name = "DESTINATION_PATH")]
    pub destination_path: PathBuf,

    /// Declare intent to modify the file system (asks for confirmation)
    #[arg(long)]
    pub apply: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for the results
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Minimum file size to consider (e.g., 512, 4KiB, 1MB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Consider files of every size, including empty ones
    #[arg(long, conflicts_with = "min_size")]
    pub no_min_size: bool,

    /// Additional directory name to skip (can be specified multiple times)
    #[arg(long = "ignore-dir", value_name = "NAME")]
    pub ignore_dirs: Vec<String>,

    /// Configuration file to use instead of the platform default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Hide the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Report errors as a JSON object on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON report for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

const SIZE_SUFFIXES: &[(&str, u64)] = &[
    ("", 1),
    ("B", 1),
    ("K", 1_000),
    ("KB", 1_000),
    ("KIB", 1 << 10),
    ("M", 1_000_000),
    ("MB", 1_000_000),
    ("MIB", 1 << 20),
    ("G", 1_000_000_000),
    ("GB", 1_000_000_000),
    ("GIB", 1 << 30),
    ("T", 1_000_000_000_000),
    ("TB", 1_000_000_000_000),
    ("TIB", 1 << 40),
];

/// Parse a human-readable size string into bytes.
///
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupemerge::cli::parse_size;
///
/// assert_eq!(parse_size("512").unwrap(), 512);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1.5MB").unwrap(), 1_500_000);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, an unknown size suffix, or does not fit in 64 bits.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err("Size cannot be negative".to_string());
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (num_str, suffix) = s.split_at(split);
    let suffix = suffix.trim().to_ascii_uppercase();

    let multiplier = SIZE_SUFFIXES
        .iter()
        .find(|(name, _)| *name == suffix)
        .map(|&(_, multiplier)| multiplier)
        .ok_or_else(|| format!("Unknown size suffix: '{suffix}'"))?;

    // Whole numbers stay exact; only fractions go through floating point.
    if let Ok(whole) = num_str.parse::<u64>() {
        return whole
            .checked_mul(multiplier)
            .ok_or_else(|| format!("Size too large: '{s}'"));
    }

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;
    let bytes = num * multiplier as f64;
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(format!("Size too large: '{s}'"));
    }
    Ok(bytes as u64)
}
