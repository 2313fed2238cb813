//! Cookbook metadata extraction (`metadata.rb`).

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Cookbook-level metadata fields. Absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Minimum Chef client version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chef_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues_url: Option<String>,
    /// Platforms from `supports` lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supports: Vec<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        *self == Metadata::default()
    }

    /// Fill fields that are still unset from `other`; platforms accumulate.
    pub fn merge_missing(&mut self, other: Metadata) {
        fn fill(slot: &mut Option<String>, value: Option<String>) {
            if slot.is_none() {
                *slot = value;
            }
        }
        fill(&mut self.name, other.name);
        fill(&mut self.version, other.version);
        fill(&mut self.description, other.description);
        fill(&mut self.maintainer, other.maintainer);
        fill(&mut self.maintainer_email, other.maintainer_email);
        fill(&mut self.license, other.license);
        fill(&mut self.chef_version, other.chef_version);
        fill(&mut self.source_url, other.source_url);
        fill(&mut self.issues_url, other.issues_url);
        for platform in other.supports {
            if !self.supports.contains(&platform) {
                self.supports.push(platform);
            }
        }
    }
}

/// Metadata plus the `depends` entries of one metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFacts {
    pub metadata: Metadata,
    pub declared: Vec<String>,
}

lazy_static! {
    static ref NAME: Regex = field("name");
    static ref VERSION: Regex = field("version");
    static ref DESCRIPTION: Regex = field("description");
    static ref MAINTAINER: Regex = field("maintainer");
    static ref MAINTAINER_EMAIL: Regex = field("maintainer_email");
    static ref LICENSE: Regex = field("license");
    static ref CHEF_VERSION: Regex = field("chef_version");
    static ref SOURCE_URL: Regex = field("source_url");
    static ref ISSUES_URL: Regex = field("issues_url");
    static ref SUPPORTS: Regex = field("supports");
    static ref DEPENDS: Regex = field("depends");
}

/// Word-bounded so `version` never matches inside `chef_version`.
fn field(keyword: &str) -> Regex {
    Regex::new(&format!(r#"\b{}\s+["']([^"']+)["']"#, keyword))
        .expect("metadata field pattern is valid")
}

fn first(pattern: &Regex, text: &str) -> Option<String> {
    pattern.captures(text).map(|caps| caps[1].to_string())
}

fn all(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Extract metadata fields and declared dependencies from metadata text.
pub fn extract_metadata(text: &str) -> MetadataFacts {
    let metadata = Metadata {
        name: first(&NAME, text),
        version: first(&VERSION, text),
        description: first(&DESCRIPTION, text),
        maintainer: first(&MAINTAINER, text),
        maintainer_email: first(&MAINTAINER_EMAIL, text),
        license: first(&LICENSE, text),
        chef_version: first(&CHEF_VERSION, text),
        source_url: first(&SOURCE_URL, text),
        issues_url: first(&ISSUES_URL, text),
        supports: all(&SUPPORTS, text),
    };
    MetadataFacts {
        metadata,
        declared: all(&DEPENDS, text),
    }
}
