use crate::config::ClientProfile;
use crate::models::{AuditRow, FlagSet};

/// Alarmist vocabulary. Matching is plain substring containment on the
/// lowercased text, so "risk" also fires inside "brisket".
pub const SCARE_TERMS: &[&str] = &[
    "danger",
    "dangerous",
    "warning",
    "harmful",
    "ban",
    "illegal",
    "immoral",
    "scam",
    "toxic",
    "deadly",
    "avoid",
    "risk",
    "risks",
    "shocking",
    "exposed",
    "crisis",
    "threat",
];

/// Whether a title or description uses scaremongering language.
/// Absent text never matches.
pub fn has_scare_language(text: Option<&str>) -> bool {
    let Some(text) = text else {
        return false;
    };
    let lower = text.to_lowercase();
    SCARE_TERMS.iter().any(|term| lower.contains(*term))
}

/// Compute the flag set for one classified row against a client profile.
pub fn flag_row(row: &AuditRow, profile: &ClientProfile) -> FlagSet {
    FlagSet {
        is_competitor: profile.competitors.contains(&row.domain),
        is_ally: profile.allies.contains(&row.domain),
        is_taboo: profile.taboo.contains(&row.domain),
        title_scaremongering: has_scare_language(row.row.title.as_deref()),
        desc_scaremongering: has_scare_language(row.row.description.as_deref()),
    }
}

/// Attach flags to every row in place.
pub fn flag_rows(rows: &mut [AuditRow], profile: &ClientProfile) {
    for row in rows.iter_mut() {
        row.flags = Some(flag_row(row, profile));
    }
}
