//! The two audit stages, from input files to written outputs.
//!
//! Every input (rules, profile, SERP export, schema) is loaded and validated
//! before the first output file is created, so a failed run leaves no
//! partial output behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::aggregate::{classify_rows, flagged_rows, top_n, CleanSummary, FlagSummary};
use crate::config::{load_profile, ClientProfile, Config};
use crate::domain::classifier::DomainClassifier;
use crate::error::AuditError;
use crate::flags::flag_rows;
use crate::input::read_serp_csv;
use crate::models::AuditRow;
use crate::report::{export, markdown};

/// Result of a stage that may legitimately have nothing to work on.
#[derive(Debug)]
pub enum Outcome<T> {
    Done(T),
    /// No rows survived the Top-N filter.
    NothingToSummarize { top_n: u32 },
}

#[derive(Debug, Serialize)]
pub struct CleanRun {
    pub summary: CleanSummary,
    pub rows: Vec<AuditRow>,
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ReportRun {
    pub summary: CleanSummary,
    pub flags: FlagSummary,
    pub flagged: Vec<AuditRow>,
    pub written: Vec<PathBuf>,
}

/// Filter, classify and score a SERP export; write the enriched rows and
/// the domain / domain-type count tables.
pub fn run_clean(
    config: &Config,
    input: &Path,
    profile_path: Option<&Path>,
    top: u32,
    out_dir: &Path,
) -> Result<Outcome<CleanRun>> {
    validate_top(top)?;

    let profile = profile_path.map(load_profile).transpose()?;
    let mut table = read_serp_csv(input, &config.columns)?;
    let classifier = build_classifier(config, profile.as_ref());

    let kept = top_n(std::mem::take(&mut table.rows), top);
    info!(
        action = "filter",
        component = "top_n",
        threshold = top,
        row_count = kept.len(),
        "Applied Top-N filter"
    );
    if kept.is_empty() {
        return Ok(Outcome::NothingToSummarize { top_n: top });
    }

    let rows = classify_rows(kept, &classifier);
    let summary = CleanSummary::from_rows(&rows, top);

    ensure_dir(out_dir)?;
    let top_path = out_dir.join(export::TOP_RESULTS_FILE);
    let domains_path = out_dir.join(export::DOMAIN_COUNTS_FILE);
    let types_path = out_dir.join(export::DOMAIN_TYPE_COUNTS_FILE);

    export::write_enriched(&top_path, &table, &rows)?;
    export::write_counts(&domains_path, "Domain", &summary.domain_counts)?;
    export::write_counts(&types_path, "DomainType", &summary.category_counts)?;

    Ok(Outcome::Done(CleanRun {
        summary,
        rows,
        written: vec![top_path, domains_path, types_path],
    }))
}

/// Flag rows against a client profile; write the Markdown summary and the
/// flagged-rows table.
pub fn run_report(
    config: &Config,
    input: &Path,
    profile_path: &Path,
    top: u32,
    out_dir: &Path,
) -> Result<Outcome<ReportRun>> {
    validate_top(top)?;

    let profile = load_profile(profile_path)?;
    let mut table = read_serp_csv(input, &config.columns)?;
    let classifier = build_classifier(config, Some(&profile));

    let kept = top_n(std::mem::take(&mut table.rows), top);
    info!(
        action = "filter",
        component = "top_n",
        threshold = top,
        row_count = kept.len(),
        "Applied Top-N filter"
    );
    if kept.is_empty() {
        return Ok(Outcome::NothingToSummarize { top_n: top });
    }

    let mut rows = classify_rows(kept, &classifier);
    flag_rows(&mut rows, &profile);

    let summary = CleanSummary::from_rows(&rows, top);
    let flags = FlagSummary::from_rows(&rows);
    let flagged = flagged_rows(&rows, table.schema.keyword.is_some());

    ensure_dir(out_dir)?;
    let md_path = out_dir.join(markdown::SUMMARY_FILE);
    let flagged_path = out_dir.join(export::FLAGGED_ROWS_FILE);

    let md = markdown::render(&summary, &flags, &profile, chrono::Local::now());
    markdown::write(&md_path, &md)?;
    export::write_flagged(&flagged_path, &table, &flagged)?;

    Ok(Outcome::Done(ReportRun {
        summary,
        flags,
        flagged,
        written: vec![md_path, flagged_path],
    }))
}

fn validate_top(top: u32) -> Result<()> {
    if top == 0 {
        return Err(AuditError::InvalidArgument("--top must be greater than 0".to_string()).into());
    }
    Ok(())
}

fn build_classifier(config: &Config, profile: Option<&ClientProfile>) -> DomainClassifier {
    let classifier = DomainClassifier::new(&config.classifier);
    match profile {
        Some(p) => classifier.with_flagged_commercial(p.flagged_commercial.iter().cloned()),
        None => classifier,
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}
