use std::path::Path;

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use tracing::info;

use crate::config::ColumnPatterns;
use crate::error::AuditError;
use crate::models::ResultRow;

/// Column indices resolved from a SERP export's header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerpSchema {
    pub position: usize,
    /// Column the normalized domain is derived from: `domain`, else `url`.
    pub domain_source: usize,
    pub domain: Option<usize>,
    pub url: Option<usize>,
    pub keyword: Option<usize>,
    pub title: Option<usize>,
    pub description: Option<usize>,
}

impl SerpSchema {
    /// Map header names onto result fields.
    ///
    /// Position and one of domain/url are required; the rest are optional.
    /// The first header matching each pattern wins.
    pub fn resolve(headers: &[String], patterns: &ColumnPatterns) -> Result<Self> {
        let find = |field: &str, pattern: &str| -> Result<Option<usize>> {
            let re = compile_pattern(field, pattern)?;
            Ok(headers.iter().position(|h| re.is_match(h.trim())))
        };

        let position = find("position", &patterns.position)?
            .ok_or(AuditError::MissingColumn("Position"))?;
        let domain = find("domain", &patterns.domain)?;
        let url = find("url", &patterns.url)?;
        let domain_source = domain
            .or(url)
            .ok_or(AuditError::MissingColumn("Domain or URL"))?;

        Ok(SerpSchema {
            position,
            domain_source,
            domain,
            url,
            keyword: find("keyword", &patterns.keyword)?,
            title: find("title", &patterns.title)?,
            description: find("description", &patterns.description)?,
        })
    }
}

fn compile_pattern(field: &str, pattern: &str) -> Result<Regex> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| AuditError::Malformed {
            what: format!("column pattern for '{}'", field),
            reason: e.to_string(),
        })?;
    Ok(re)
}

/// A parsed SERP export: original headers, resolved schema, typed rows.
#[derive(Debug, Clone)]
pub struct SerpTable {
    pub headers: Vec<String>,
    pub schema: SerpSchema,
    pub rows: Vec<ResultRow>,
}

impl SerpTable {
    pub fn header(&self, index: Option<usize>) -> Option<&str> {
        index.and_then(|i| self.headers.get(i)).map(String::as_str)
    }
}

/// Read a SERP CSV export from disk.
pub fn read_serp_csv(path: &Path, patterns: &ColumnPatterns) -> Result<SerpTable> {
    if !path.exists() {
        return Err(AuditError::InputMissing {
            what: "SERP export",
            path: path.to_path_buf(),
        }
        .into());
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let table = parse_serp(file, patterns)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    info!(
        action = "read",
        component = "serp_input",
        file_path = ?path,
        row_count = table.rows.len(),
        "Read SERP export"
    );
    Ok(table)
}

/// Parse CSV data with a header row into a [`SerpTable`].
pub fn parse_serp<R: std::io::Read>(reader: R, patterns: &ColumnPatterns) -> Result<SerpTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AuditError::Malformed {
            what: "SERP header row".to_string(),
            reason: e.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let schema = SerpSchema::resolve(&headers, patterns)?;
    let mut rows = Vec::new();
    let mut unranked = 0usize;

    for (idx, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = record.map_err(|e| AuditError::Malformed {
            what: format!("SERP row {}", line),
            reason: e.to_string(),
        })?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();

        let cell = |i: Option<usize>| -> Option<String> {
            i.and_then(|i| fields.get(i))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let position_raw = fields
            .get(schema.position)
            .map(|v| v.trim())
            .unwrap_or("");
        // Unranked rows (ads, featured blocks) never pass Top-N.
        if position_raw.is_empty() {
            unranked += 1;
            continue;
        }
        let position = parse_position(position_raw).ok_or_else(|| AuditError::Malformed {
            what: format!("SERP row {}", line),
            reason: format!("position '{}' is not a positive integer", position_raw),
        })?;

        rows.push(ResultRow {
            keyword: cell(schema.keyword),
            position,
            raw_domain: cell(Some(schema.domain_source)).unwrap_or_default(),
            url: cell(schema.url),
            title: cell(schema.title),
            description: cell(schema.description),
            fields,
        });
    }

    if unranked > 0 {
        info!(
            action = "skip",
            component = "serp_input",
            row_count = unranked,
            "Skipped rows without a position"
        );
    }

    Ok(SerpTable {
        headers,
        schema,
        rows,
    })
}

/// Accepts `3` and integral floats such as `3.0`; rejects zero, negatives
/// and anything non-numeric.
fn parse_position(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return (n > 0).then_some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f >= 1.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(csv: &str) -> Result<SerpTable> {
        parse_serp(csv.as_bytes(), &ColumnPatterns::default())
    }

    fn audit_error(err: anyhow::Error) -> AuditError {
        err.downcast::<AuditError>().expect("expected an AuditError")
    }

    #[test]
    fn test_parse_full_export() {
        let table = parse(
            "Keyword,Position,URL,Page Title,Meta Description\n\
             solar panels,1,https://www.energy.gov/solar,Solar basics,Learn about solar\n\
             solar panels,2,https://reddit.com/r/solar,,\n",
        )
        .unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.schema.position, 1);
        assert_eq!(table.schema.domain, None);
        assert_eq!(table.schema.url, Some(2));
        assert_eq!(table.schema.domain_source, 2);
        assert_eq!(table.header(table.schema.title), Some("Page Title"));
        assert_eq!(table.header(table.schema.description), Some("Meta Description"));

        let first = &table.rows[0];
        assert_eq!(first.keyword.as_deref(), Some("solar panels"));
        assert_eq!(first.position, 1);
        assert_eq!(first.raw_domain, "https://www.energy.gov/solar");
        assert_eq!(first.title.as_deref(), Some("Solar basics"));
        assert_eq!(first.fields.len(), 5);

        let second = &table.rows[1];
        assert_eq!(second.title, None);
        assert_eq!(second.description, None);
    }

    #[test]
    fn test_domain_column_preferred_over_url() {
        let table = parse("position,domain,url\n3,example.com,https://other.com/x\n").unwrap();
        assert_eq!(table.rows[0].raw_domain, "example.com");
        assert_eq!(table.rows[0].url.as_deref(), Some("https://other.com/x"));
        assert_eq!(table.schema.domain_source, 1);
    }

    #[test]
    fn test_blank_position_rows_are_skipped() {
        let table = parse("Position,Domain\n1,a.com\n,b.com\n").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].raw_domain, "a.com");

        let table = parse("Position,Domain\n  ,ad.com\n2,b.com\n").unwrap();
        let positions: Vec<u32> = table.rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![2]);
    }

    #[test]
    fn test_snippet_and_rank_columns() {
        let table = parse("Rank,Domain,Snippet\n4,a.com,Some text\n").unwrap();
        assert_eq!(table.rows[0].position, 4);
        assert_eq!(table.rows[0].description.as_deref(), Some("Some text"));
        assert_eq!(table.schema.title, None);
    }

    #[test]
    fn test_missing_position_column() {
        let err = audit_error(parse("Domain,Title\na.com,x\n").unwrap_err());
        assert!(matches!(err, AuditError::MissingColumn("Position")));
    }

    #[test]
    fn test_missing_domain_and_url_columns() {
        let err = audit_error(parse("Position,Title\n1,x\n").unwrap_err());
        assert!(matches!(err, AuditError::MissingColumn("Domain or URL")));
    }

    #[test]
    fn test_bad_position_value() {
        let err = audit_error(parse("Position,Domain\n1,a.com\nfirst,b.com\n").unwrap_err());
        match err {
            AuditError::Malformed { what, reason } => {
                assert_eq!(what, "SERP row 3");
                assert!(reason.contains("first"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("7"), Some(7));
        assert_eq!(parse_position(" 10 "), Some(10));
        assert_eq!(parse_position("3.0"), Some(3));
        assert_eq!(parse_position("2.5"), None);
        assert_eq!(parse_position("0"), None);
        assert_eq!(parse_position("-1"), None);
        assert_eq!(parse_position(""), None);
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let table = parse("Position,Domain,Title\n1,a.com\n").unwrap();
        assert_eq!(table.rows[0].title, None);
    }

    #[test]
    fn test_invalid_column_pattern() {
        let patterns = ColumnPatterns {
            title: "(".to_string(),
            ..ColumnPatterns::default()
        };
        let err = audit_error(parse_serp("Position,Domain\n".as_bytes(), &patterns).unwrap_err());
        assert!(matches!(err, AuditError::Malformed { .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let err = audit_error(
            read_serp_csv(Path::new("/nonexistent/serp.csv"), &ColumnPatterns::default())
                .unwrap_err(),
        );
        assert!(matches!(err, AuditError::InputMissing { .. }));
    }

    #[test]
    fn test_read_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "Position,Domain").unwrap();
        writeln!(f, "1,wwf.org").unwrap();
        writeln!(f, "11,shop.com").unwrap();

        let table = read_serp_csv(f.path(), &ColumnPatterns::default()).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].position, 11);
    }
}
