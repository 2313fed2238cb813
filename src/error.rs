//! Error types for the extraction engine.
//!
//! None of these escape `Extractor::extract`: the aggregator treats every
//! error as "use the pattern fallback" and records the outcome as data.

use thiserror::Error;

use crate::language::Language;

/// Errors raised by a single grammar-backed extraction step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no grammar parser loaded for {0}")]
    GrammarUnavailable(Language),
    #[error("{language} parser produced no tree")]
    ParseFailed { language: Language },
    #[error("content is binary, not text")]
    Undecodable,
}

/// Errors raised while loading a grammar into the registry.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("no grammar bundled for {0}")]
    NotBundled(Language),
    #[cfg(feature = "tree-sitter")]
    #[error("incompatible {language} grammar: {source}")]
    Incompatible {
        language: Language,
        #[source]
        source: tree_sitter::LanguageError,
    },
}
