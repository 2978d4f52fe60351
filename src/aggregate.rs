use std::collections::HashMap;

use serde::Serialize;

use crate::domain::classifier::DomainClassifier;
use crate::domain::normalize::normalize_domain;
use crate::domain::score::credibility_score;
use crate::models::{AuditRow, DomainCategory, ResultRow};

pub const DEFAULT_TOP_N: u32 = 10;

/// Keep rows ranked at or above `threshold`, preserving input order.
pub fn top_n(rows: Vec<ResultRow>, threshold: u32) -> Vec<ResultRow> {
    rows.into_iter().filter(|r| r.position <= threshold).collect()
}

/// Normalize, classify and score every row.
pub fn classify_rows(rows: Vec<ResultRow>, classifier: &DomainClassifier) -> Vec<AuditRow> {
    rows.into_iter()
        .map(|row| {
            let domain = normalize_domain(&row.raw_domain);
            let category = classifier.classify(&domain);
            AuditRow {
                row,
                domain,
                category,
                credibility_score: credibility_score(category),
                flags: None,
            }
        })
        .collect()
}

/// Count occurrences of each key, most frequent first. Ties keep the order
/// in which keys were first seen.
pub fn count_by<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + std::hash::Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn domain_counts(rows: &[AuditRow]) -> Vec<(String, usize)> {
    count_by(rows.iter().map(|r| r.domain.clone()))
}

pub fn category_counts(rows: &[AuditRow]) -> Vec<(DomainCategory, usize)> {
    count_by(rows.iter().map(|r| r.category))
}

/// Rows with at least one flag, sorted by (keyword, position) when a keyword
/// column exists, otherwise by position. Rows without a keyword sort last.
pub fn flagged_rows(rows: &[AuditRow], has_keyword: bool) -> Vec<AuditRow> {
    let mut flagged: Vec<AuditRow> = rows.iter().filter(|r| r.any_flag()).cloned().collect();
    if has_keyword {
        flagged.sort_by(|a, b| {
            let (ka, kb) = (&a.row.keyword, &b.row.keyword);
            ka.is_none()
                .cmp(&kb.is_none())
                .then_with(|| ka.cmp(kb))
                .then(a.row.position.cmp(&b.row.position))
        });
    } else {
        flagged.sort_by_key(|r| r.row.position);
    }
    flagged
}

/// A domain hit for one of the profile lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub domain: String,
    pub position: u32,
}

/// Aggregate view of the classification stage.
#[derive(Debug, Serialize)]
pub struct CleanSummary {
    pub row_count: usize,
    pub top_n: u32,
    pub domain_counts: Vec<(String, usize)>,
    pub category_counts: Vec<(DomainCategory, usize)>,
    pub has_social: bool,
    pub has_forum: bool,
}

impl CleanSummary {
    pub fn from_rows(rows: &[AuditRow], top_n: u32) -> Self {
        CleanSummary {
            row_count: rows.len(),
            top_n,
            domain_counts: domain_counts(rows),
            category_counts: category_counts(rows),
            has_social: rows.iter().any(|r| r.category == DomainCategory::SocialMedia),
            has_forum: rows
                .iter()
                .any(|r| r.category == DomainCategory::CommunityForum),
        }
    }
}

/// Aggregate view of the flagging stage.
#[derive(Debug, Serialize)]
pub struct FlagSummary {
    pub competitor_hits: Vec<Hit>,
    pub ally_hits: Vec<Hit>,
    pub taboo_hits: Vec<Hit>,
    /// Rows whose title or description uses scaremongering language,
    /// in filtered order.
    pub scare_rows: Vec<AuditRow>,
}

impl FlagSummary {
    pub fn from_rows(rows: &[AuditRow]) -> Self {
        let hits = |pick: fn(&AuditRow) -> bool| -> Vec<Hit> {
            rows.iter()
                .filter(|r| pick(r))
                .map(|r| Hit {
                    domain: r.domain.clone(),
                    position: r.row.position,
                })
                .collect()
        };

        FlagSummary {
            competitor_hits: hits(|r| r.flags.as_ref().is_some_and(|f| f.is_competitor)),
            ally_hits: hits(|r| r.flags.as_ref().is_some_and(|f| f.is_ally)),
            taboo_hits: hits(|r| r.flags.as_ref().is_some_and(|f| f.is_taboo)),
            scare_rows: rows
                .iter()
                .filter(|r| r.flags.as_ref().is_some_and(|f| f.has_scare_language()))
                .cloned()
                .collect(),
        }
    }
}
