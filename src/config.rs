use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::domain::normalize::normalize_domain;
use crate::error::AuditError;

/// Root configuration structure, deserialized from `.serp-audit/rules.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Domain lists feeding the classifier.
    pub classifier: ClassifierRules,
    /// Header-name patterns used to map the SERP export onto result fields.
    pub columns: ColumnPatterns,
}

/// Domain tables consumed by [`DomainClassifier`](crate::domain::classifier::DomainClassifier).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    /// Forum hosts; subdomains match too. Checked before `social_media`.
    pub community_forums: Vec<String>,
    /// Social platforms; subdomains match too.
    pub social_media: Vec<String>,
    /// Exact hosts reported as `commercial_fossil_fuel`. Empty unless an
    /// audit supplies them.
    pub flagged_commercial: Vec<String>,
    /// Substrings that mark a host as news media.
    pub news_hints: Vec<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        ClassifierRules {
            community_forums: to_strings(&["reddit.com", "old.reddit.com", "quora.com"]),
            social_media: to_strings(&[
                "youtube.com",
                "youtu.be",
                "x.com",
                "twitter.com",
                "tiktok.com",
                "facebook.com",
                "instagram.com",
                "linkedin.com",
            ]),
            flagged_commercial: Vec::new(),
            news_hints: to_strings(&[
                "news",
                "times",
                "guardian",
                "tribune",
                "post",
                "chronicle",
                "telegraph",
            ]),
        }
    }
}

/// Case-insensitive regexes matched against CSV header names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnPatterns {
    pub position: String,
    pub domain: String,
    pub url: String,
    pub keyword: String,
    pub title: String,
    pub description: String,
}

impl Default for ColumnPatterns {
    fn default() -> Self {
        ColumnPatterns {
            position: "^(position|rank)$".to_string(),
            domain: "^domain$".to_string(),
            url: "^(url|link)$".to_string(),
            keyword: "^(keyword|query)$".to_string(),
            title: "title".to_string(),
            description: "description|snippet".to_string(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Load the rules configuration, searching in order:
///
/// 1. `config_override`: path passed via `--rules`
/// 2. `./.serp-audit/rules.toml`
/// 3. `~/.config/serp-audit/rules.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        if !path.exists() {
            return Err(AuditError::InputMissing {
                what: "rules file",
                path: path.to_path_buf(),
            }
            .into());
        }
        return read_config(path);
    }

    let project_config = Path::new(".serp-audit").join("rules.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("serp-audit").join("rules.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    info!(action = "load", component = "rules", "Using built-in classifier rules");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    info!(action = "load", component = "rules", file_path = ?path, "Loading rules file");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file {}", path.display()))?;
    let config = toml::from_str(&content).map_err(|e| AuditError::Malformed {
        what: format!("rules file {}", path.display()),
        reason: e.to_string(),
    })?;
    Ok(config)
}

/// A client's domain lists, normalized and ready for set lookups.
#[derive(Debug, Clone, Default)]
pub struct ClientProfile {
    pub competitors: HashSet<String>,
    pub allies: HashSet<String>,
    pub taboo: HashSet<String>,
    pub regions: Vec<String>,
    pub languages: Vec<String>,
    /// Extra hosts for the classifier's flagged-commercial set.
    pub flagged_commercial: Vec<String>,
}

/// On-disk shape of `client_profile.json`.
#[derive(Debug, Deserialize)]
struct RawProfile {
    competitors: Option<Vec<String>>,
    allies: Option<Vec<String>>,
    taboo: Option<Vec<String>>,
    #[serde(default)]
    regions: Vec<String>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    flagged_commercial: Vec<String>,
}

/// Load and validate a client profile.
///
/// A missing file, a blank file, unparseable JSON and a profile with none of
/// the three domain lists are each reported as a distinct [`AuditError`].
pub fn load_profile(path: &Path) -> Result<ClientProfile> {
    if !path.exists() {
        return Err(AuditError::InputMissing {
            what: "client profile",
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read client profile {}", path.display()))?;
    let profile = parse_profile(&content, path)?;

    info!(
        action = "loaded",
        component = "client_profile",
        competitors = profile.competitors.len(),
        allies = profile.allies.len(),
        taboo = profile.taboo.len(),
        "Loaded client profile"
    );
    Ok(profile)
}

fn parse_profile(content: &str, path: &Path) -> Result<ClientProfile> {
    if content.trim().is_empty() {
        return Err(AuditError::ProfileEmpty(path.to_path_buf()).into());
    }

    let raw: RawProfile = serde_json::from_str(content).map_err(|e| AuditError::Malformed {
        what: format!("client profile {}", path.display()),
        reason: e.to_string(),
    })?;

    if raw.competitors.is_none() && raw.allies.is_none() && raw.taboo.is_none() {
        return Err(AuditError::MissingProfileCategories(PathBuf::from(path)).into());
    }

    Ok(ClientProfile {
        competitors: domain_set(raw.competitors),
        allies: domain_set(raw.allies),
        taboo: domain_set(raw.taboo),
        regions: raw.regions,
        languages: raw.languages,
        flagged_commercial: raw
            .flagged_commercial
            .iter()
            .map(|d| normalize_domain(d))
            .filter(|d| !d.is_empty())
            .collect(),
    })
}

fn domain_set(list: Option<Vec<String>>) -> HashSet<String> {
    list.unwrap_or_default()
        .iter()
        .map(|d| normalize_domain(d))
        .filter(|d| !d.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn profile_from(content: &str) -> Result<ClientProfile> {
        parse_profile(content, Path::new("client_profile.json"))
    }

    fn audit_error(err: anyhow::Error) -> AuditError {
        err.downcast::<AuditError>().expect("expected an AuditError")
    }

    #[test]
    fn test_profile_domains_are_normalized() {
        let profile = profile_from(
            r#"{
                "competitors": ["https://www.Rival.com/about", ""],
                "allies": ["friend.org"],
                "taboo": [],
                "regions": ["UK"]
            }"#,
        )
        .unwrap();

        assert!(profile.competitors.contains("rival.com"));
        assert_eq!(profile.competitors.len(), 1);
        assert!(profile.allies.contains("friend.org"));
        assert!(profile.taboo.is_empty());
        assert_eq!(profile.regions, vec!["UK".to_string()]);
        assert!(profile.languages.is_empty());
    }

    #[test]
    fn test_blank_profile_is_empty_error() {
        let err = audit_error(profile_from("  \n").unwrap_err());
        assert!(matches!(err, AuditError::ProfileEmpty(_)));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = audit_error(profile_from("{ competitors: ").unwrap_err());
        assert!(matches!(err, AuditError::Malformed { .. }));

        let err = audit_error(profile_from(r#"{"competitors": "rival.com"}"#).unwrap_err());
        assert!(matches!(err, AuditError::Malformed { .. }));
    }

    #[test]
    fn test_profile_without_categories() {
        let err = audit_error(profile_from(r#"{"regions": ["US"]}"#).unwrap_err());
        assert!(matches!(err, AuditError::MissingProfileCategories(_)));
    }

    #[test]
    fn test_missing_profile_file() {
        let err = audit_error(load_profile(Path::new("/nonexistent/profile.json")).unwrap_err());
        assert!(matches!(err, AuditError::InputMissing { .. }));
    }

    #[test]
    fn test_load_profile_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{"taboo": ["bad.example"], "flagged_commercial": ["www.oilco.com"]}}"#)
            .unwrap();

        let profile = load_profile(f.path()).unwrap();
        assert!(profile.taboo.contains("bad.example"));
        assert_eq!(profile.flagged_commercial, vec!["oilco.com".to_string()]);
    }

    #[test]
    fn test_rules_file_overrides_only_given_keys() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[classifier]").unwrap();
        writeln!(f, r#"flagged_commercial = ["exxon.com", "shell.com"]"#).unwrap();
        writeln!(f, "[columns]").unwrap();
        writeln!(f, r#"title = "^headline$""#).unwrap();

        let config = load_config(Some(f.path())).unwrap();
        assert_eq!(config.classifier.flagged_commercial.len(), 2);
        assert!(config
            .classifier
            .community_forums
            .contains(&"reddit.com".to_string()));
        assert_eq!(config.columns.title, "^headline$");
        assert_eq!(config.columns.position, "^(position|rank)$");
    }

    #[test]
    fn test_malformed_rules_file() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[classifier").unwrap();

        let err = audit_error(load_config(Some(f.path())).unwrap_err());
        assert!(matches!(err, AuditError::Malformed { .. }));
    }

    #[test]
    fn test_missing_rules_override() {
        let err = audit_error(load_config(Some(Path::new("/nonexistent/rules.toml"))).unwrap_err());
        assert!(matches!(err, AuditError::InputMissing { .. }));
    }
}
