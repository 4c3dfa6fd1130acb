//! DupeMerge - classify incoming files against an existing library.
//!
//! Files under `<input>/unclassified` are grouped by byte-identical content
//! and compared against a destination tree. Each group is reported as
//! unique (not yet in the destination) or duplicate (already there).

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod layout;
pub mod logging;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod reconcile;
pub mod scanner;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::{AppError, ExitCode};
use crate::layout::InputLayout;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};
use crate::reconcile::Reconciler;

/// Run the application with the process's standard streams.
///
/// # Errors
///
/// Returns an error if the input layout or the configuration is invalid, or
/// if either tree cannot be read. The error downcasts to [`AppError`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();
    run_app_with(cli, &mut input, &mut stdout, &mut stderr)
}

/// Run the application with explicit streams.
///
/// The `--apply` confirmation is read from `input` and written to `prompt_out`;
/// results go to `output`.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_app_with<R, W, P>(
    cli: Cli,
    input: &mut R,
    output: &mut W,
    prompt_out: &mut P,
) -> Result<ExitCode>
where
    R: BufRead,
    W: Write,
    P: Write,
{
    log::info!(
        "Starting {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let layout = InputLayout::validate(&cli.input_path, &cli.destination_path)?;
    log::info!("Input path: {}", layout.input.display());
    log::info!("Destination path: {}", layout.destination.display());

    let config = Config::load(cli.config.as_deref())?.merge_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    if cli.apply {
        let confirmation = prompt::confirm_apply(input, prompt_out)
            .map_err(|e| AppError::io("reading the confirmation", e))?;
        if !confirmation.proceeds() {
            return Ok(ExitCode::Success);
        }
        log::warn!("Applying changes is not supported yet; only detecting");
    } else {
        log::info!("Make changes is set to false, no file system changes will be made.");
    }

    let quiet_progress = cli.quiet || cli.no_progress;
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(quiet_progress));
    let finder_config = FinderConfig::default()
        .with_walker_config(config.walker_config())
        .with_progress_callback(Arc::clone(&progress));
    let finder = DuplicateFinder::new(finder_config);

    log::info!(
        "Building unclassified file index from {}",
        layout.unclassified.display()
    );
    let (unclassified, unclassified_summary) = finder
        .find_duplicates(&layout.unclassified)
        .map_err(|e| AppError::from_scan(&layout.unclassified, e))?;

    log::info!(
        "Building destination file index from {}",
        layout.destination.display()
    );
    let (destination, destination_summary) = finder
        .find_duplicates(&layout.destination)
        .map_err(|e| AppError::from_scan(&layout.destination, e))?;

    let report = Reconciler::with_defaults()
        .with_progress_callback(progress)
        .reconcile(&unclassified, &destination)
        .map_err(AppError::from)?;

    let stats = report.stats();
    log::info!(
        "{} unique group(s), {} duplicate group(s), {} size collision(s)",
        stats.unique_groups,
        stats.duplicate_groups,
        stats.size_collisions
    );

    match cli.output {
        OutputFormat::Text => TextOutput::new(&unclassified_summary, &destination_summary, &report)
            .write_to(output)
            .map_err(|e| AppError::io("writing output", e))?,
        OutputFormat::Json => JsonOutput::new(&unclassified_summary, &destination_summary, &report)
            .write_to(output, true)
            .map_err(|e| AppError::io("writing output", e))?,
    }

    Ok(ExitCode::Success)
}
