//! Language identification for cookbook files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the extractor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Ruby resource DSL (recipes, attributes, metadata.rb).
    Ruby,
    /// YAML documents (kitchen configs, inventories, data bags).
    Yaml,
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ruby => "ruby",
            Language::Yaml => "yaml",
            Language::Unknown => "unknown",
        }
    }

    /// Determine the language from a file name's extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".rb") {
            Some(Language::Ruby)
        } else if lower.ends_with(".yml") || lower.ends_with(".yaml") {
            Some(Language::Yaml)
        } else {
            None
        }
    }

    /// Guess the language from file content.
    ///
    /// Crude by nature: resource keywords win over YAML markers.
    pub fn from_content(content: &str) -> Self {
        let lower = content.to_lowercase();
        if lower.contains("package ") || lower.contains("service ") {
            Language::Ruby
        } else if lower.contains("---") || lower.contains("hosts:") {
            Language::Yaml
        } else {
            Language::Unknown
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ruby" => Ok(Language::Ruby),
            "yaml" => Ok(Language::Yaml),
            "unknown" => Ok(Language::Unknown),
            _ => Err(format!("unknown language: {}", s)),
        }
    }
}

/// Detect a file's language, by extension first and content second.
pub fn detect_language(filename: &str, content: &str) -> Language {
    Language::from_filename(filename).unwrap_or_else(|| Language::from_content(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_wins() {
        assert_eq!(detect_language("recipes/default.rb", ""), Language::Ruby);
        assert_eq!(
            detect_language(".kitchen.YML", "package \"x\""),
            Language::Yaml
        );
        assert_eq!(detect_language("site.yaml", ""), Language::Yaml);
    }

    #[test]
    fn test_content_heuristic() {
        assert_eq!(
            detect_language("Policyfile", "package \"httpd\""),
            Language::Ruby
        );
        assert_eq!(
            detect_language("Berksfile", "SERVICE 'nginx'"),
            Language::Ruby
        );
        assert_eq!(
            detect_language("inventory", "---\nfoo: bar\n"),
            Language::Yaml
        );
        assert_eq!(detect_language("playbook", "- hosts: all"), Language::Yaml);
        assert_eq!(detect_language("README", "plain words"), Language::Unknown);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Ruby".parse::<Language>(), Ok(Language::Ruby));
        assert!("cobol".parse::<Language>().is_err());
    }
}
