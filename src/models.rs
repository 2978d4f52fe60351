use serde::{Deserialize, Serialize};

/// One ranked search result as read from the SERP export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub keyword: Option<String>,
    pub position: u32,
    /// Bare host or full URL, exactly as it appeared in the source cell.
    pub raw_domain: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Every cell of the source record, in header order.
    #[serde(skip)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainCategory {
    Government,
    Education,
    NgoOrg,
    NewsMedia,
    CommunityForum,
    SocialMedia,
    CommercialFossilFuel,
    Commercial,
    Unknown,
}

impl DomainCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainCategory::Government => "government",
            DomainCategory::Education => "education",
            DomainCategory::NgoOrg => "ngo_org",
            DomainCategory::NewsMedia => "news_media",
            DomainCategory::CommunityForum => "community_forum",
            DomainCategory::SocialMedia => "social_media",
            DomainCategory::CommercialFossilFuel => "commercial_fossil_fuel",
            DomainCategory::Commercial => "commercial",
            DomainCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DomainCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-row flags produced by the flag engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSet {
    pub is_competitor: bool,
    pub is_ally: bool,
    pub is_taboo: bool,
    pub title_scaremongering: bool,
    pub desc_scaremongering: bool,
}

impl FlagSet {
    pub fn has_scare_language(&self) -> bool {
        self.title_scaremongering || self.desc_scaremongering
    }

    pub fn any(&self) -> bool {
        self.is_competitor || self.is_ally || self.is_taboo || self.has_scare_language()
    }
}

/// A result row enriched with its normalized domain, category, score and
/// (in the report stage) flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRow {
    #[serde(flatten)]
    pub row: ResultRow,
    pub domain: String,
    pub category: DomainCategory,
    pub credibility_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<FlagSet>,
}

impl AuditRow {
    pub fn any_flag(&self) -> bool {
        self.flags.as_ref().is_some_and(FlagSet::any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_are_snake_case() {
        assert_eq!(DomainCategory::NgoOrg.to_string(), "ngo_org");
        assert_eq!(
            DomainCategory::CommercialFossilFuel.to_string(),
            "commercial_fossil_fuel"
        );
        assert_eq!(
            serde_json::to_string(&DomainCategory::CommunityForum).unwrap(),
            "\"community_forum\""
        );
    }

    #[test]
    fn test_any_flag_combines_all_flags() {
        let mut flags = FlagSet::default();
        assert!(!flags.any());

        flags.desc_scaremongering = true;
        assert!(flags.has_scare_language());
        assert!(flags.any());

        let flags = FlagSet {
            is_taboo: true,
            ..FlagSet::default()
        };
        assert!(!flags.has_scare_language());
        assert!(flags.any());
    }
}
