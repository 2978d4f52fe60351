use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::info;

use crate::aggregate::{CleanSummary, FlagSummary, Hit};
use crate::config::ClientProfile;

pub const SUMMARY_FILE: &str = "serp_audit_summary.md";

const LIST_LIMIT: usize = 10;
const TITLE_MAX_CHARS: usize = 140;

/// Render the client-facing audit summary.
pub fn render(
    clean: &CleanSummary,
    flags: &FlagSummary,
    profile: &ClientProfile,
    generated_at: DateTime<Local>,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# SERP Audit Summary".to_string());
    lines.push(String::new());
    lines.push(format!(
        "**Rows after filtering (≤{}): {}**",
        clean.top_n, clean.row_count
    ));
    lines.push(String::new());
    lines.push(format!("_Generated: {}_", generated_at.format("%Y-%m-%d %H:%M")));
    lines.push(String::new());

    lines.push("## Top Domains".to_string());
    if clean.domain_counts.is_empty() {
        lines.push("- None".to_string());
    }
    for (domain, count) in clean.domain_counts.iter().take(LIST_LIMIT) {
        lines.push(format!("- {} ({})", display_domain(domain), count));
    }
    lines.push(String::new());

    lines.push("## Domain Types".to_string());
    if clean.category_counts.is_empty() {
        lines.push("- None".to_string());
    }
    for (category, count) in &clean.category_counts {
        lines.push(format!("- {}: {}", category, count));
    }
    lines.push(String::new());

    lines.push("## Notes".to_string());
    lines.push(format!(
        "- Community forums present: {}",
        yes_no(clean.has_forum)
    ));
    lines.push(format!("- Social media present: {}", yes_no(clean.has_social)));
    if !profile.regions.is_empty() {
        lines.push(format!("- Regions: {}", profile.regions.join(", ")));
    }
    if !profile.languages.is_empty() {
        lines.push(format!("- Languages: {}", profile.languages.join(", ")));
    }
    lines.push(String::new());

    push_hits(
        &mut lines,
        "## Competitor Visibility",
        &flags.competitor_hits,
        &format!("- None detected in top {}.", clean.top_n),
        "",
    );
    push_hits(
        &mut lines,
        "## Ally Presence",
        &flags.ally_hits,
        &format!("- No allies detected in top {}.", clean.top_n),
        "",
    );
    push_hits(
        &mut lines,
        "## Taboo Domains",
        &flags.taboo_hits,
        &format!("- None detected in top {}.", clean.top_n),
        " (review advised)",
    );

    lines.push("## Potential Scaremongering / Stigma Language".to_string());
    if flags.scare_rows.is_empty() {
        lines.push("- None detected in titles/descriptions.".to_string());
    }
    for row in flags.scare_rows.iter().take(LIST_LIMIT) {
        let title = row.row.title.as_deref().unwrap_or("").trim();
        lines.push(format!(
            "- {} at position {}: {}",
            display_domain(&row.domain),
            row.row.position,
            truncate(title, TITLE_MAX_CHARS)
        ));
    }
    lines.push(String::new());

    lines.join("\n")
}

fn push_hits(lines: &mut Vec<String>, heading: &str, hits: &[Hit], empty: &str, suffix: &str) {
    lines.push(heading.to_string());
    if hits.is_empty() {
        lines.push(empty.to_string());
    }
    for hit in hits {
        lines.push(format!(
            "- {} at position {}{}",
            display_domain(&hit.domain),
            hit.position,
            suffix
        ));
    }
    lines.push(String::new());
}

fn display_domain(domain: &str) -> &str {
    if domain.is_empty() {
        "(unknown)"
    } else {
        domain
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Cut `text` to `max` characters, appending `...` when anything was dropped.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

pub fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write Markdown summary to {}", path.display()))?;
    info!(action = "write", component = "markdown_summary", file_path = ?path, "Wrote Markdown summary");
    Ok(())
}
