//! Substitution rule sets.
//!
//! A rule set is an ordered list of literal `from` → `to` substitutions,
//! plus the file suffixes they apply to and glob patterns to exclude.
//! Rules execute in declaration order: a later rule sees the output of an
//! earlier one.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::files;

/// Suffix scope used when neither the rules file nor the CLI names one.
pub const DEFAULT_SUFFIX: &str = ".go";

/// A single literal substitution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Literal text to find. Every occurrence is replaced.
    pub from: String,
    /// Replacement text. May be empty to delete matches.
    pub to: String,
    /// Suffixes this rule applies to. Falls back to the set-level suffixes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffixes: Option<Vec<String>>,
}

/// An ordered substitution list with tree-wide scope settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    /// File name endings that are rewrite candidates.
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
    /// Glob patterns (matched against root-relative paths) to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_suffixes() -> Vec<String> {
    vec![DEFAULT_SUFFIX.to_string()]
}

impl RuleSet {
    /// Build a one-rule set from a `--from`/`--to` pair.
    pub fn single(from: impl Into<String>, to: impl Into<String>) -> Self {
        RuleSet {
            rules: vec![Rule {
                from: from.into(),
                to: to.into(),
                suffixes: None,
            }],
            suffixes: default_suffixes(),
            exclude: Vec::new(),
        }
    }

    /// Effective suffix scope for one rule.
    pub fn suffixes_for<'a>(&'a self, rule: &'a Rule) -> &'a [String] {
        rule.suffixes.as_deref().unwrap_or(&self.suffixes)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(Error::rules_invalid_value(
                None,
                "Rule set contains no rules",
            ));
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.from.is_empty() {
                return Err(Error::rules_invalid_value(
                    Some(index),
                    format!("Rule {} has an empty 'from' string", index),
                ));
            }
            if let Some(suffixes) = &rule.suffixes {
                if suffixes.iter().any(|s| s.is_empty()) {
                    return Err(Error::rules_invalid_value(
                        Some(index),
                        format!("Rule {} has an empty suffix entry", index),
                    ));
                }
            }
        }

        if self.suffixes.is_empty() {
            return Err(Error::rules_invalid_value(
                None,
                "Suffix list is empty; nothing would match",
            ));
        }
        if self.suffixes.iter().any(|s| s.is_empty()) {
            return Err(Error::rules_invalid_value(
                None,
                "Suffix list contains an empty entry",
            ));
        }

        Ok(())
    }
}

/// Load and validate a rules file.
pub fn load(path: &Path) -> Result<RuleSet> {
    if !path.exists() {
        return Err(Error::rules_not_found(path.display().to_string()));
    }

    let raw = files::read(path)?;
    let set: RuleSet = serde_json::from_str(&raw)
        .map_err(|e| Error::rules_invalid_json(path.display().to_string(), e))?;

    set.validate()?;
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use tempfile::tempdir;

    fn write_rules(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("rules.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_parses_rules_in_order() {
        let dir = tempdir().unwrap();
        let path = write_rules(
            dir.path(),
            r#"{
                "rules": [
                    { "from": "github.com/widgetco", "to": "github.com/gadgetco" },
                    { "from": "WidgetManager", "to": "GadgetManager" }
                ]
            }"#,
        );

        let set = load(&path).unwrap();
        assert_eq!(set.rules.len(), 2);
        assert_eq!(set.rules[0].from, "github.com/widgetco");
        assert_eq!(set.rules[1].to, "GadgetManager");
        assert_eq!(set.suffixes, vec![DEFAULT_SUFFIX.to_string()]);
        assert!(set.exclude.is_empty());
    }

    #[test]
    fn load_honors_suffix_and_exclude_settings() {
        let dir = tempdir().unwrap();
        let path = write_rules(
            dir.path(),
            r#"{
                "suffixes": [".go", ".md"],
                "exclude": ["**/testdata/**"],
                "rules": [
                    { "from": "widget", "to": "gadget", "suffixes": [".go"] }
                ]
            }"#,
        );

        let set = load(&path).unwrap();
        assert_eq!(set.suffixes, vec![".go".to_string(), ".md".to_string()]);
        assert_eq!(set.exclude, vec!["**/testdata/**".to_string()]);
        assert_eq!(
            set.suffixes_for(&set.rules[0]),
            &[".go".to_string()],
            "per-rule suffixes override the set-level list"
        );
    }

    #[test]
    fn suffixes_for_falls_back_to_set_level() {
        let set = RuleSet::single("widget", "gadget");
        assert_eq!(set.suffixes_for(&set.rules[0]), &[".go".to_string()]);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::RulesNotFound);
    }

    #[test]
    fn load_malformed_json() {
        let dir = tempdir().unwrap();
        let path = write_rules(dir.path(), "{ not json");
        let err = load(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::RulesInvalidJson);
    }

    #[test]
    fn validate_rejects_empty_rule_list() {
        let dir = tempdir().unwrap();
        let path = write_rules(dir.path(), r#"{ "rules": [] }"#);
        let err = load(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::RulesInvalidValue);
    }

    #[test]
    fn validate_rejects_empty_from() {
        let dir = tempdir().unwrap();
        let path = write_rules(
            dir.path(),
            r#"{ "rules": [ { "from": "", "to": "gadget" } ] }"#,
        );
        let err = load(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::RulesInvalidValue);
        assert_eq!(err.details["ruleIndex"], 0);
    }

    #[test]
    fn validate_allows_empty_to() {
        let set = RuleSet::single("widget", "");
        assert!(set.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_suffix_list() {
        let dir = tempdir().unwrap();
        let path = write_rules(
            dir.path(),
            r#"{ "suffixes": [], "rules": [ { "from": "a", "to": "b" } ] }"#,
        );
        let err = load(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::RulesInvalidValue);
    }
}
