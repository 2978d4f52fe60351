use std::collections::HashSet;

use crate::config::ClassifierRules;
use crate::domain::normalize::normalize_domain;
use crate::models::DomainCategory;

/// Rule-based domain categorizer.
///
/// Built once from [`ClassifierRules`]; every list entry is normalized on
/// construction so lookups compare like with like. Rules are evaluated in a
/// fixed order and the first match wins, because the lists may overlap:
///
/// 1. empty domain → `unknown`
/// 2. community forum (exact or subdomain)
/// 3. social media (exact or subdomain)
/// 4. flagged commercial (exact only)
/// 5. `.gov` label → `government`
/// 6. `.edu` / `.ac` label → `education`
/// 7. `.org` label → `ngo_org`
/// 8. news hint substring → `news_media`
/// 9. everything else → `commercial`
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    community_forums: Vec<String>,
    social_media: Vec<String>,
    flagged_commercial: HashSet<String>,
    news_hints: Vec<String>,
}

impl DomainClassifier {
    pub fn new(rules: &ClassifierRules) -> Self {
        DomainClassifier {
            community_forums: normalize_all(&rules.community_forums),
            social_media: normalize_all(&rules.social_media),
            flagged_commercial: normalize_all(&rules.flagged_commercial)
                .into_iter()
                .collect(),
            news_hints: rules
                .news_hints
                .iter()
                .map(|h| h.trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Add per-client hosts to the flagged-commercial set.
    pub fn with_flagged_commercial<I>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.flagged_commercial.extend(
            domains
                .into_iter()
                .map(|d| normalize_domain(&d))
                .filter(|d| !d.is_empty()),
        );
        self
    }

    /// Normalize `raw` and classify the result.
    pub fn classify(&self, raw: &str) -> DomainCategory {
        self.classify_normalized(&normalize_domain(raw))
    }

    fn classify_normalized(&self, domain: &str) -> DomainCategory {
        if domain.is_empty() {
            return DomainCategory::Unknown;
        }

        if listed(domain, &self.community_forums) {
            return DomainCategory::CommunityForum;
        }

        if listed(domain, &self.social_media) {
            return DomainCategory::SocialMedia;
        }

        if self.flagged_commercial.contains(domain) {
            return DomainCategory::CommercialFossilFuel;
        }

        if has_label(domain, "gov") {
            return DomainCategory::Government;
        }

        if has_label(domain, "edu") || has_label(domain, "ac") {
            return DomainCategory::Education;
        }

        if has_label(domain, "org") {
            return DomainCategory::NgoOrg;
        }

        if self.news_hints.iter().any(|hint| domain.contains(hint.as_str())) {
            return DomainCategory::NewsMedia;
        }

        DomainCategory::Commercial
    }
}

impl Default for DomainClassifier {
    fn default() -> Self {
        DomainClassifier::new(&ClassifierRules::default())
    }
}

fn normalize_all(domains: &[String]) -> Vec<String> {
    domains
        .iter()
        .map(|d| normalize_domain(d))
        .filter(|d| !d.is_empty())
        .collect()
}

/// `domain` equals a member or is a subdomain of one.
fn listed(domain: &str, members: &[String]) -> bool {
    members.iter().any(|member| {
        domain == member
            || domain
                .strip_suffix(member.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// `label` appears as a non-leading label: the TLD (`x.gov`) or an inner
/// label (`x.gov.uk`).
fn has_label(domain: &str, label: &str) -> bool {
    let mut labels = domain.split('.');
    labels.next();
    labels.any(|l| l == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CATEGORIES: [DomainCategory; 9] = [
        DomainCategory::Government,
        DomainCategory::Education,
        DomainCategory::NgoOrg,
        DomainCategory::NewsMedia,
        DomainCategory::CommunityForum,
        DomainCategory::SocialMedia,
        DomainCategory::CommercialFossilFuel,
        DomainCategory::Commercial,
        DomainCategory::Unknown,
    ];

    fn classify(domain: &str) -> DomainCategory {
        DomainClassifier::default().classify(domain)
    }

    #[test]
    fn test_reference_domains() {
        assert_eq!(classify("reddit.com"), DomainCategory::CommunityForum);
        assert_eq!(classify("sub.reddit.com"), DomainCategory::CommunityForum);
        assert_eq!(classify("youtube.com"), DomainCategory::SocialMedia);
        assert_eq!(classify("agency.gov"), DomainCategory::Government);
        assert_eq!(classify("university.edu"), DomainCategory::Education);
        assert_eq!(classify("wwf.org"), DomainCategory::NgoOrg);
        assert_eq!(classify("dailynews.com"), DomainCategory::NewsMedia);
        assert_eq!(classify("shoestore.com"), DomainCategory::Commercial);
        assert_eq!(classify(""), DomainCategory::Unknown);
    }

    #[test]
    fn test_raw_urls_are_normalized_first() {
        assert_eq!(
            classify("https://www.reddit.com/r/climate"),
            DomainCategory::CommunityForum
        );
        assert_eq!(classify("  https:// "), DomainCategory::Unknown);
        assert_eq!(classify("http://m.YouTube.com/watch"), DomainCategory::SocialMedia);
    }

    #[test]
    fn test_subdomain_match_requires_label_boundary() {
        assert_eq!(classify("notreddit.com"), DomainCategory::Commercial);
        assert_eq!(classify("max.com"), DomainCategory::Commercial);
        assert_eq!(classify("sub.x.com"), DomainCategory::SocialMedia);
    }

    #[test]
    fn test_inner_labels() {
        assert_eq!(classify("gov.uk"), DomainCategory::Commercial);
        assert_eq!(classify("www.gov.uk"), DomainCategory::Commercial);
        assert_eq!(classify("service.gov.uk"), DomainCategory::Government);
        assert_eq!(classify("ox.ac.uk"), DomainCategory::Education);
        assert_eq!(classify("unimelb.edu.au"), DomainCategory::Education);
        assert_eq!(classify("charity.org.uk"), DomainCategory::NgoOrg);
        assert_eq!(classify("government.com"), DomainCategory::Commercial);
    }

    #[test]
    fn test_tld_rules_beat_news_hints() {
        assert_eq!(classify("news.gov"), DomainCategory::Government);
        assert_eq!(classify("washingtonpost.org"), DomainCategory::NgoOrg);
        assert_eq!(classify("nytimes.com"), DomainCategory::NewsMedia);
    }

    #[test]
    fn test_forum_wins_over_social_and_org() {
        let rules = ClassifierRules {
            community_forums: vec!["forum.org".to_string()],
            social_media: vec!["forum.org".to_string()],
            ..ClassifierRules::default()
        };
        let classifier = DomainClassifier::new(&rules);
        assert_eq!(classifier.classify("forum.org"), DomainCategory::CommunityForum);
        assert_eq!(
            classifier.classify("boards.forum.org"),
            DomainCategory::CommunityForum
        );
    }

    #[test]
    fn test_flagged_commercial_is_exact_match() {
        let rules = ClassifierRules {
            flagged_commercial: vec!["https://www.Exxon.com".to_string()],
            ..ClassifierRules::default()
        };
        let classifier = DomainClassifier::new(&rules);
        assert_eq!(classifier.classify("exxon.com"), DomainCategory::CommercialFossilFuel);
        assert_eq!(classifier.classify("corporate.exxon.com"), DomainCategory::Commercial);
    }

    #[test]
    fn test_flagged_commercial_is_empty_by_default() {
        assert_eq!(classify("shell.com"), DomainCategory::Commercial);
        let classifier =
            DomainClassifier::default().with_flagged_commercial(vec!["shell.com".to_string()]);
        assert_eq!(classifier.classify("shell.com"), DomainCategory::CommercialFossilFuel);
    }

    #[test]
    fn test_social_wins_over_flagged_commercial() {
        let classifier =
            DomainClassifier::default().with_flagged_commercial(vec!["youtube.com".to_string()]);
        assert_eq!(classifier.classify("youtube.com"), DomainCategory::SocialMedia);
    }

    #[test]
    fn test_deterministic_and_total() {
        let classifier = DomainClassifier::default();
        for d in ["", "a", "x.gov", "weird..domain", "https://", "???", "news"] {
            let first = classifier.classify(d);
            assert_eq!(classifier.classify(d), first);
            assert!(ALL_CATEGORIES.contains(&first));
        }
    }
}
