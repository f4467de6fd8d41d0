//! nginx-cache-info - inspect and patch nginx proxy cache files
//!
//! Decodes the binary header nginx writes at the start of every
//! `proxy_cache` file (expiry, Last-Modified, ETag, cache key, offsets of
//! the cached HTTP response) and can rewrite the expiry in place without
//! touching any other byte.

pub mod batch;
pub mod cli;
pub mod codec;
pub mod config;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod output;

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};

use crate::batch::{Action, BatchSummary, FileOutcome};
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};

/// Run the application for parsed arguments.
///
/// Per-file failures are reported and reflected in the exit code; only
/// failures outside file processing are returned as `Err`.
///
/// # Errors
///
/// Fails if the `--set-expire` date cannot be resolved or the report
/// cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let config = Config::load();
    let utc = cli.utc || config.utc;
    let format = cli.output.unwrap_or(config.output);

    if cli.no_color || !io::stdout().is_terminal() {
        yansi::disable();
    }

    let action = match cli.set_expire {
        Some(date) => Action::SetExpire(
            date.to_epoch(utc)
                .context("Failed to resolve --set-expire date")?,
        ),
        None => Action::Inspect,
    };
    log::debug!("Processing {} path(s): {:?}, format {}", cli.paths.len(), action, format);

    let outcomes = batch::process_paths(&cli.paths, action);
    report(&outcomes, format, utc, cli.quiet)?;

    let summary = BatchSummary::from_outcomes(&outcomes);
    log::info!(
        "{} file(s), {} failed, {} patched",
        summary.total,
        summary.failed,
        summary.patched
    );
    if summary.failed > 0 {
        Ok(ExitCode::FileErrors)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Print every outcome in order; failures always go to stderr.
fn report(outcomes: &[FileOutcome], format: OutputFormat, utc: bool, quiet: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report_errors = || {
        for outcome in outcomes {
            if let Err(e) = &outcome.result {
                eprintln!("{}: {}: {}", outcome.path.display(), e.kind(), e);
            }
        }
    };

    if quiet {
        report_errors();
        return Ok(());
    }

    match format {
        OutputFormat::Text => {
            let mut first = true;
            for outcome in outcomes {
                match &outcome.result {
                    Ok(info) => {
                        if !first {
                            writeln!(out)?;
                        }
                        first = false;
                        TextOutput::new(info, utc)
                            .write_to(&mut out)
                            .context("Failed to write report")?;
                        out.flush()?;
                    }
                    Err(e) => eprintln!("{}: {}: {}", outcome.path.display(), e.kind(), e),
                }
            }
        }
        OutputFormat::Json => {
            JsonOutput::new(outcomes, utc)
                .write_to(&mut out)
                .context("Failed to write JSON report")?;
            report_errors();
        }
        OutputFormat::Csv => {
            CsvOutput::new(outcomes, utc)
                .write_to(&mut out)
                .context("Failed to write CSV report")?;
            report_errors();
        }
    }
    out.flush()?;
    Ok(())
}
