//! Fact set structures produced by one extraction call.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::extract::{Metadata, Resources};
use crate::language::Language;

/// Fixed tag identifying this extraction method in status output.
pub const EXTRACTOR_VERSION: &str = "cookfacts-extractor-v1";

/// A file handed to the extractor. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// How a file's facts were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Grammar,
    Pattern,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::Grammar => write!(f, "grammar"),
            ExtractionMethod::Pattern => write!(f, "pattern"),
        }
    }
}

/// How a syntax verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationMethod {
    #[serde(rename = "grammar")]
    Grammar,
    #[serde(rename = "structured-fallback")]
    StructuredFallback,
    #[serde(rename = "optimistic")]
    Optimistic,
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMethod::Grammar => write!(f, "grammar"),
            ValidationMethod::StructuredFallback => write!(f, "structured-fallback"),
            ValidationMethod::Optimistic => write!(f, "optimistic"),
        }
    }
}

/// Syntactic validity of one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxVerdict {
    pub file: String,
    pub valid: bool,
    pub detected_language: Language,
    pub method: ValidationMethod,
}

/// Cookbook dependencies, split by how they were stated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    /// `depends` entries from cookbook metadata.
    pub declared: Vec<String>,
    /// `include_recipe` targets from recipes.
    pub referenced: Vec<String>,
}

impl Dependencies {
    pub fn total(&self) -> usize {
        self.declared.len() + self.referenced.len()
    }

    pub fn dedup(&mut self) {
        dedup_stable(&mut self.declared);
        dedup_stable(&mut self.referenced);
    }
}

/// Summary counters for a fact set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_resources: usize,
    pub total_dependencies: usize,
    pub files_processed: usize,
    /// Resource-bearing files whose resources came from the grammar walker.
    pub grammar_files: usize,
    /// Resource-bearing files that fell back to patterns.
    pub pattern_files: usize,
    /// Predominant extraction method.
    pub extraction_method: ExtractionMethod,
}

/// Grammar availability, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorStatus {
    pub enabled: bool,
    pub parsers_loaded: Vec<Language>,
    pub version: String,
}

/// Everything extracted from one set of files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSet {
    pub metadata: Metadata,
    pub resources: Resources,
    pub dependencies: Dependencies,
    pub syntax_validation: Vec<SyntaxVerdict>,
    pub summary: Summary,
    pub status: ExtractorStatus,
    /// S-expressions of grammar-parsed recipes, when requested.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub debug_ast: BTreeMap<String, String>,
}

impl FactSet {
    /// Whether every file passed syntax validation.
    pub fn all_valid(&self) -> bool {
        self.syntax_validation.iter().all(|v| v.valid)
    }

    /// Verdicts for files that failed validation.
    pub fn invalid_files(&self) -> impl Iterator<Item = &SyntaxVerdict> {
        self.syntax_validation.iter().filter(|v| !v.valid)
    }

    pub fn verdict(&self, file: &str) -> Option<&SyntaxVerdict> {
        self.syntax_validation.iter().find(|v| v.file == file)
    }
}

/// Remove repeated elements, keeping the first occurrence of each.
pub fn dedup_stable(items: &mut Vec<String>) {
    let mut seen = HashSet::with_capacity(items.len());
    items.retain(|item| seen.insert(item.clone()));
}
