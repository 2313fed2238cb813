//! Extractor configuration.
//!
//! Configuration is an explicit immutable value built once and handed to the
//! grammar registry and extractor. It can be read from a YAML file:
//!
//! ```yaml
//! enabled: true
//! supported_languages: [ruby, yaml]
//! metadata_file: metadata.rb
//! debug_ast: false
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::language::Language;

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["cookfacts.yaml", ".cookfacts.yaml"];

/// Default designated metadata file name.
pub const DEFAULT_METADATA_FILE: &str = "metadata.rb";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Whether grammar-based parsing should be attempted at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Languages to load grammars for, in order.
    #[serde(default = "default_languages")]
    pub supported_languages: Vec<Language>,
    /// File name (last path component) of the cookbook metadata file.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
    /// Attach S-expressions of grammar-parsed Ruby files to the fact set.
    #[serde(default)]
    pub debug_ast: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_languages() -> Vec<Language> {
    vec![Language::Ruby, Language::Yaml]
}

fn default_metadata_file() -> String {
    DEFAULT_METADATA_FILE.to_string()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            supported_languages: default_languages(),
            metadata_file: default_metadata_file(),
            debug_ast: false,
        }
    }
}

impl ExtractorConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse a config from YAML text.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty document means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: ExtractorConfig = serde_yaml::from_str(content)?;
        config.dedup_languages();
        Ok(config)
    }

    /// Load a config file, falling back to built-in defaults on any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            None => Self::default(),
            Some(p) => match Self::parse_file(p) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("config load failed, using defaults: {:#}", e);
                    Self::default()
                }
            },
        }
    }

    /// Whether `filename` names the designated metadata file.
    pub fn is_metadata_file(&self, filename: &str) -> bool {
        let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        base == self.metadata_file
    }

    fn dedup_languages(&mut self) {
        let mut seen = Vec::with_capacity(self.supported_languages.len());
        self.supported_languages.retain(|lang| {
            if seen.contains(lang) {
                false
            } else {
                seen.push(*lang);
                true
            }
        });
    }
}

/// Look for a config file in the current directory.
pub fn discover() -> Option<std::path::PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(std::path::PathBuf::from)
        .find(|p| p.exists())
}
