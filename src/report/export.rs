use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::input::SerpTable;
use crate::models::AuditRow;

pub const TOP_RESULTS_FILE: &str = "serp_results_top10.csv";
pub const DOMAIN_COUNTS_FILE: &str = "domain_counts.csv";
pub const DOMAIN_TYPE_COUNTS_FILE: &str = "domain_type_counts.csv";
pub const FLAGGED_ROWS_FILE: &str = "flagged_rows.csv";

const DERIVED_COLUMNS: [&str; 3] = ["Domain", "DomainType", "CredibilityScore"];

/// Write the enriched rows: every source column except those replaced by a
/// derived column, followed by `Domain`, `DomainType`, `CredibilityScore`.
pub fn write_enriched(path: &Path, table: &SerpTable, rows: &[AuditRow]) -> Result<()> {
    let kept: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            !DERIVED_COLUMNS
                .iter()
                .any(|d| d.eq_ignore_ascii_case(h.trim()))
        })
        .map(|(i, _)| i)
        .collect();

    let mut writer = open(path)?;

    let mut header: Vec<&str> = kept.iter().map(|&i| table.headers[i].as_str()).collect();
    header.extend(DERIVED_COLUMNS);
    writer.write_record(&header)?;

    for row in rows {
        let mut record: Vec<String> = kept
            .iter()
            .map(|&i| row.row.fields.get(i).cloned().unwrap_or_default())
            .collect();
        record.push(row.domain.clone());
        record.push(row.category.to_string());
        record.push(row.credibility_score.to_string());
        writer.write_record(&record)?;
    }

    finish(writer, path, rows.len())
}

/// Write a two-column `<key_header>,count` table.
pub fn write_counts<K: ToString>(path: &Path, key_header: &str, counts: &[(K, usize)]) -> Result<()> {
    let mut writer = open(path)?;
    writer.write_record([key_header, "count"])?;
    for (key, count) in counts {
        writer.write_record([key.to_string(), count.to_string()])?;
    }
    finish(writer, path, counts.len())
}

/// Write flagged rows with a compact set of columns. An empty slice still
/// produces the header row.
pub fn write_flagged(path: &Path, table: &SerpTable, rows: &[AuditRow]) -> Result<()> {
    let has_keyword = table.schema.keyword.is_some();
    let has_url = table.schema.url.is_some();
    let title_header = table.header(table.schema.title);
    let desc_header = table.header(table.schema.description);

    let mut header: Vec<&str> = Vec::new();
    if has_keyword {
        header.push("Keyword");
    }
    header.extend(["Position", "Domain"]);
    if has_url {
        header.push("URL");
    }
    header.extend([
        "DomainType",
        "IsCompetitor",
        "IsAlly",
        "IsTaboo",
        "TitleScaremongering",
        "DescScaremongering",
        "AnyScaremongering",
    ]);
    header.extend(title_header);
    header.extend(desc_header);

    let mut writer = open(path)?;
    writer.write_record(&header)?;

    for row in rows {
        let flags = row.flags.clone().unwrap_or_default();
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if has_keyword {
            record.push(row.row.keyword.clone().unwrap_or_default());
        }
        record.push(row.row.position.to_string());
        record.push(row.domain.clone());
        if has_url {
            record.push(row.row.url.clone().unwrap_or_default());
        }
        record.push(row.category.to_string());
        for flag in [
            flags.is_competitor,
            flags.is_ally,
            flags.is_taboo,
            flags.title_scaremongering,
            flags.desc_scaremongering,
            flags.has_scare_language(),
        ] {
            record.push(bool_cell(flag).to_string());
        }
        if title_header.is_some() {
            record.push(row.row.title.clone().unwrap_or_default());
        }
        if desc_header.is_some() {
            record.push(row.row.description.clone().unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    finish(writer, path, rows.len())
}

/// Capitalized to stay readable by spreadsheet tooling that produced the
/// original exports.
fn bool_cell(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn open(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))
}

fn finish(mut writer: csv::Writer<std::fs::File>, path: &Path, rows: usize) -> Result<()> {
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(action = "write", component = "csv_export", file_path = ?path, row_count = rows, "Wrote CSV");
    Ok(())
}
