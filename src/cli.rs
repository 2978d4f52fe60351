use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::aggregate::DEFAULT_TOP_N;

#[derive(Parser, Debug)]
#[command(
    name = "serp-audit",
    about = "Classify search result domains and flag client-relevant SERP rows",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter to the top results, classify domains, and write count tables
    Clean {
        /// SERP export to read
        #[arg(default_value = "serp_results.csv")]
        input: PathBuf,

        /// Client profile whose `flagged_commercial` list extends the classifier
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Flag competitor, ally, taboo and scaremongering rows and write the audit summary
    Report {
        /// Cleaned SERP export to read
        #[arg(default_value = "serp_results_top10.csv")]
        input: PathBuf,

        /// Client profile (competitors, allies, taboo)
        #[arg(long, value_name = "FILE", default_value = "client_profile.json")]
        profile: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Keep results ranked at or above this position
    #[arg(long, default_value_t = DEFAULT_TOP_N, value_name = "N")]
    pub top: u32,

    /// Directory output files are written to
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Rules file [default: ./.serp-audit/rules.toml, fallback ~/.config/serp-audit/rules.toml]
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Output format for the summary
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub format: ReportFormat,

    /// Show every row and enable info-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
