//! Bundled tree-sitter grammars.

use tree_sitter::Parser;

use crate::error::GrammarError;
use crate::language::Language;

/// Resolve the bundled grammar for a language.
fn bundled(language: Language) -> Result<tree_sitter::Language, GrammarError> {
    match language {
        Language::Ruby => Ok(tree_sitter_ruby::LANGUAGE.into()),
        Language::Yaml => Ok(tree_sitter_yaml::LANGUAGE.into()),
        Language::Unknown => Err(GrammarError::NotBundled(language)),
    }
}

/// Load a grammar and check that it attaches to a parser.
///
/// Attaching is where ABI mismatches surface, so a grammar that loads here
/// is usable for the lifetime of the registry.
pub(crate) fn load(language: Language) -> Result<tree_sitter::Language, GrammarError> {
    let grammar = bundled(language)?;
    let mut parser = Parser::new();
    parser
        .set_language(&grammar)
        .map_err(|source| GrammarError::Incompatible { language, source })?;
    Ok(grammar)
}
