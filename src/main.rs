//! DupeMerge - entry point for the CLI application.

use clap::error::ErrorKind;
use clap::Parser;
use dupemerge::{
    cli::Cli,
    error::{AppError, ExitCode, StructuredError},
    logging::init_logging,
};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                std::process::exit(ExitCode::Success.as_i32());
            }
            _ => {
                let json_errors = std::env::args().any(|arg| arg == "--json-errors");
                let err = anyhow::Error::new(AppError::InvalidArgument(
                    err.render().to_string().trim_end().to_string(),
                ));
                report(&err, ExitCode::Failure, json_errors);
                std::process::exit(ExitCode::Failure.as_i32());
            }
        },
    };

    init_logging(cli.verbose, cli.quiet);
    let json_errors = cli.json_errors;

    match dupemerge::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = err
                .downcast_ref::<AppError>()
                .map_or(ExitCode::Failure, AppError::exit_code);
            report(&err, exit_code, json_errors);
            std::process::exit(exit_code.as_i32());
        }
    }
}

fn report(err: &anyhow::Error, exit_code: ExitCode, json_errors: bool) {
    if json_errors {
        let structured = StructuredError::new(err, exit_code);
        if let Ok(json) = serde_json::to_string_pretty(&structured) {
            eprintln!("{}", json);
            return;
        }
    }
    eprintln!("[{}] Error: {}", exit_code.code_prefix(), err);
}
