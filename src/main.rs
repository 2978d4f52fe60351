//! `serp-audit`: classify search-result domains and flag rows that matter to a client.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load classifier rules and column patterns ([`config::load_config`]).
//! 3. Read the SERP export through an explicit column mapping ([`input`]).
//! 4. Keep the Top-N rows, then normalize, classify and score domains ([`domain`]).
//! 5. `report` only: flag rows against the client profile ([`flags`]).
//! 6. Aggregate counts and hit lists ([`aggregate`]) and write outputs ([`report`]).
//! 7. Exit `0` (including "nothing to summarize") or `1` on any input error.

mod aggregate;
mod cli;
mod config;
mod domain;
mod error;
mod flags;
mod input;
mod models;
mod pipeline;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, CommonArgs, ReportFormat};
use config::load_config;
use pipeline::{run_clean, run_report, Outcome};

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Command::Clean { common, .. } | Command::Report { common, .. } => common.verbose,
    };
    setup_logging(verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Clean {
            input,
            profile,
            common,
        } => {
            let config = load_config(common.rules.as_deref())?;
            let outcome = run_clean(
                &config,
                &input,
                profile.as_deref(),
                common.top,
                &common.out_dir,
            )?;

            let Some(run) = finished(outcome, &common)? else {
                return Ok(());
            };
            match common.format {
                ReportFormat::Terminal => {
                    report::terminal::render_clean(
                        &run.rows,
                        &run.summary,
                        common.verbose,
                        common.quiet,
                    );
                    announce(&run.written, common.quiet);
                }
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
            }
        }
        Command::Report {
            input,
            profile,
            common,
        } => {
            let config = load_config(common.rules.as_deref())?;
            let outcome = run_report(&config, &input, &profile, common.top, &common.out_dir)?;

            let Some(run) = finished(outcome, &common)? else {
                return Ok(());
            };
            match common.format {
                ReportFormat::Terminal => {
                    announce(&run.written, common.quiet);
                    report::terminal::render_flags(
                        &run.flags,
                        &run.flagged,
                        common.verbose,
                        common.quiet,
                    );
                }
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
            }
        }
    }

    Ok(())
}

/// JSON body printed when no rows survive the Top-N filter.
#[derive(Debug, Serialize)]
struct EmptyResult {
    nothing_to_summarize: bool,
    top_n: u32,
}

fn empty_result_json(top_n: u32) -> Result<String> {
    let body = EmptyResult {
        nothing_to_summarize: true,
        top_n,
    };
    Ok(serde_json::to_string_pretty(&body)?)
}

/// Unwrap a completed run, reporting the empty-result state instead.
fn finished<T>(outcome: Outcome<T>, common: &CommonArgs) -> Result<Option<T>> {
    match outcome {
        Outcome::Done(run) => Ok(Some(run)),
        Outcome::NothingToSummarize { top_n } => {
            if common.format == ReportFormat::Json {
                println!("{}", empty_result_json(top_n)?);
            } else {
                println!("No rows at Position ≤ {}. Nothing to summarize.", top_n);
            }
            Ok(None)
        }
    }
}

fn announce(written: &[PathBuf], quiet: bool) {
    if quiet {
        return;
    }
    for path in written {
        eprintln!("  {} wrote {}", "→".cyan(), path.display());
    }
}
