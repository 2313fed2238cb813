//! Fact aggregation across all files of one extraction call.
//!
//! Files are processed independently and merged in input order, then every
//! list is deduplicated keeping first occurrences. The result depends only
//! on the input files and the registry's grammar availability.

use std::borrow::Cow;
use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::extract::{
    extract_file, extract_metadata, FileExtraction, Metadata, MetadataFacts, Resources,
};
use crate::facts::{
    Dependencies, ExtractionMethod, ExtractorStatus, FactSet, SourceFile, Summary, SyntaxVerdict,
};
use crate::grammar::GrammarRegistry;
use crate::language::{detect_language, Language};
use crate::validate::{undecodable, validate_syntax};

/// Extracts fact sets from cookbook files.
///
/// Holds an immutable config and grammar registry; safe to share across
/// threads and reuse for any number of calls.
pub struct Extractor {
    config: ExtractorConfig,
    registry: GrammarRegistry,
}

/// What one file contributed.
enum FileRole {
    Metadata(MetadataFacts),
    Recipe(FileExtraction),
    Other,
}

struct FileOutcome {
    name: String,
    role: FileRole,
    verdict: SyntaxVerdict,
}

impl Extractor {
    /// Build an extractor, loading grammars per `config`.
    pub fn new(config: ExtractorConfig) -> Self {
        let registry = GrammarRegistry::new(&config);
        Self { config, registry }
    }

    /// Build an extractor around an existing registry.
    pub fn with_registry(config: ExtractorConfig, registry: GrammarRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn registry(&self) -> &GrammarRegistry {
        &self.registry
    }

    pub fn status(&self) -> ExtractorStatus {
        self.registry.status()
    }

    /// Extract facts from `files`, processed in slice order.
    pub fn extract(&self, files: &[SourceFile]) -> FactSet {
        let outcomes: Vec<FileOutcome> = files.iter().map(|f| self.process_file(f)).collect();
        self.merge(outcomes)
    }

    /// Like [`Extractor::extract`], parsing files on the rayon pool.
    ///
    /// Per-file results are buffered and merged in input order, so the
    /// result is identical to the sequential path.
    pub fn extract_parallel(&self, files: &[SourceFile]) -> FactSet {
        let outcomes: Vec<FileOutcome> = files.par_iter().map(|f| self.process_file(f)).collect();
        self.merge(outcomes)
    }

    fn process_file(&self, file: &SourceFile) -> FileOutcome {
        let text = match decode(&file.content) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(file = %file.name, "skipping file: {}", e);
                return FileOutcome {
                    name: file.name.clone(),
                    role: FileRole::Other,
                    verdict: undecodable(&file.name),
                };
            }
        };

        let role = if self.config.is_metadata_file(&file.name) {
            FileRole::Metadata(extract_metadata(&text))
        } else if detect_language(&file.name, &text) == Language::Ruby {
            FileRole::Recipe(extract_file(
                &self.registry,
                &file.name,
                Language::Ruby,
                &text,
                self.config.debug_ast,
            ))
        } else {
            FileRole::Other
        };

        FileOutcome {
            name: file.name.clone(),
            role,
            verdict: validate_syntax(&self.registry, &file.name, &text),
        }
    }

    fn merge(&self, outcomes: Vec<FileOutcome>) -> FactSet {
        let mut metadata = Metadata::default();
        let mut resources = Resources::new();
        let mut dependencies = Dependencies::default();
        let mut syntax_validation = Vec::with_capacity(outcomes.len());
        let mut debug_ast = BTreeMap::new();
        let mut grammar_files = 0;
        let mut pattern_files = 0;
        let files_processed = outcomes.len();

        for outcome in outcomes {
            match outcome.role {
                FileRole::Metadata(facts) => {
                    metadata.merge_missing(facts.metadata);
                    dependencies.declared.extend(facts.declared);
                }
                FileRole::Recipe(extraction) => {
                    match extraction.method {
                        ExtractionMethod::Grammar => grammar_files += 1,
                        ExtractionMethod::Pattern => pattern_files += 1,
                    }
                    resources.extend(extraction.resources);
                    dependencies.referenced.extend(extraction.references);
                    if let Some(sexp) = extraction.sexp {
                        debug_ast.insert(outcome.name, sexp);
                    }
                }
                FileRole::Other => {}
            }
            syntax_validation.push(outcome.verdict);
        }

        resources.dedup();
        dependencies.dedup();

        let extraction_method = if grammar_files + pattern_files == 0 {
            if self.registry.is_enabled() {
                ExtractionMethod::Grammar
            } else {
                ExtractionMethod::Pattern
            }
        } else if grammar_files > pattern_files {
            ExtractionMethod::Grammar
        } else {
            ExtractionMethod::Pattern
        };

        let summary = Summary {
            total_resources: resources.total(),
            total_dependencies: dependencies.total(),
            files_processed,
            grammar_files,
            pattern_files,
            extraction_method,
        };

        FactSet {
            metadata,
            resources,
            dependencies,
            syntax_validation,
            summary,
            status: self.registry.status(),
            debug_ast,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

/// Decode file content as UTF-8, replacing invalid sequences.
///
/// NUL bytes mark binary content, which is not treated as text at all.
fn decode(content: &[u8]) -> Result<Cow<'_, str>, ExtractionError> {
    if content.contains(&0) {
        return Err(ExtractionError::Undecodable);
    }
    Ok(String::from_utf8_lossy(content))
}
