//! Grammar registry: per-language tree-sitter grammars loaded once.
//!
//! A registry is built from an [`ExtractorConfig`] and is read-only after
//! construction, so one instance can be shared by concurrent extraction calls.
//! Grammars that fail to load are logged and left out; if none load the
//! registry reports itself disabled and extraction runs on patterns alone.

#[cfg(feature = "tree-sitter")]
mod languages;

use crate::config::ExtractorConfig;
use crate::facts::{ExtractorStatus, EXTRACTOR_VERSION};
use crate::language::Language;

#[cfg(feature = "tree-sitter")]
use crate::error::ExtractionError;
#[cfg(feature = "tree-sitter")]
use crate::syntax::ParsedFile;

pub struct GrammarRegistry {
    /// Loaded grammars, in configured order.
    #[cfg(feature = "tree-sitter")]
    grammars: Vec<(Language, tree_sitter::Language)>,
    #[cfg(not(feature = "tree-sitter"))]
    grammars: Vec<(Language, ())>,
}

impl GrammarRegistry {
    /// Load grammars for every configured language.
    pub fn new(config: &ExtractorConfig) -> Self {
        if !config.enabled {
            tracing::info!("grammar parsing disabled by configuration");
            return Self::disabled();
        }

        let registry = Self::load_all(&config.supported_languages);
        if registry.is_enabled() {
            tracing::info!(
                languages = ?registry.loaded_languages(),
                "grammar registry initialized"
            );
        } else {
            tracing::warn!("no grammars available, pattern-only mode");
        }
        registry
    }

    /// A registry with no grammars.
    pub fn disabled() -> Self {
        Self {
            grammars: Vec::new(),
        }
    }

    #[cfg(feature = "tree-sitter")]
    fn load_all(wanted: &[Language]) -> Self {
        let mut grammars: Vec<(Language, tree_sitter::Language)> = Vec::new();
        for &language in wanted {
            if grammars.iter().any(|(l, _)| *l == language) {
                continue;
            }
            match languages::load(language) {
                Ok(grammar) => grammars.push((language, grammar)),
                Err(e) => tracing::warn!("grammar for {} unavailable: {}", language, e),
            }
        }
        Self { grammars }
    }

    #[cfg(not(feature = "tree-sitter"))]
    fn load_all(_wanted: &[Language]) -> Self {
        Self::disabled()
    }

    /// Whether any grammar loaded.
    pub fn is_enabled(&self) -> bool {
        !self.grammars.is_empty()
    }

    pub fn has_parser(&self, language: Language) -> bool {
        self.grammars.iter().any(|(l, _)| *l == language)
    }

    /// Languages with a working grammar, in load order.
    pub fn loaded_languages(&self) -> Vec<Language> {
        self.grammars.iter().map(|(l, _)| *l).collect()
    }

    /// Parse `text` with the grammar for `language`.
    ///
    /// Trees with syntax errors are still returned; callers inspect
    /// [`ParsedFile::has_errors`].
    #[cfg(feature = "tree-sitter")]
    pub fn parse(&self, language: Language, text: &str) -> Result<ParsedFile, ExtractionError> {
        let grammar = self
            .grammars
            .iter()
            .find(|(l, _)| *l == language)
            .map(|(_, g)| g)
            .ok_or(ExtractionError::GrammarUnavailable(language))?;

        // tree_sitter::Parser is not Sync, so each call gets its own.
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(grammar)
            .map_err(|_| ExtractionError::GrammarUnavailable(language))?;
        let tree = parser
            .parse(text, None)
            .ok_or(ExtractionError::ParseFailed { language })?;

        Ok(ParsedFile {
            tree,
            source: text.to_string(),
            language,
        })
    }

    /// Diagnostic snapshot of the registry.
    pub fn status(&self) -> ExtractorStatus {
        ExtractorStatus {
            enabled: self.is_enabled(),
            parsers_loaded: self.loaded_languages(),
            version: EXTRACTOR_VERSION.to_string(),
        }
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}
