//! Per-file syntax validation.
//!
//! Method priority: the grammar when one is loaded for the file's language,
//! then a structural YAML parse for YAML files, and otherwise an optimistic
//! `valid = true`. Files in languages we cannot check are never flagged.

use serde::Deserialize;

use crate::facts::{SyntaxVerdict, ValidationMethod};
use crate::grammar::GrammarRegistry;
use crate::language::{detect_language, Language};

/// Validate one file's syntax with the best method available.
pub fn validate_syntax(registry: &GrammarRegistry, filename: &str, text: &str) -> SyntaxVerdict {
    let language = detect_language(filename, text);

    if let Some(valid) = grammar_check(registry, language, filename, text) {
        return verdict(filename, valid, language, ValidationMethod::Grammar);
    }

    if language == Language::Yaml {
        let valid = yaml_is_well_formed(filename, text);
        let method = ValidationMethod::StructuredFallback;
        return verdict(filename, valid, language, method);
    }

    verdict(filename, true, language, ValidationMethod::Optimistic)
}

/// Verdict for content that could not be decoded as text.
pub fn undecodable(filename: &str) -> SyntaxVerdict {
    let method = ValidationMethod::Optimistic;
    verdict(filename, true, Language::Unknown, method)
}

fn verdict(
    filename: &str,
    valid: bool,
    language: Language,
    method: ValidationMethod,
) -> SyntaxVerdict {
    SyntaxVerdict {
        file: filename.to_string(),
        valid,
        detected_language: language,
        method,
    }
}

#[cfg(feature = "tree-sitter")]
fn grammar_check(
    registry: &GrammarRegistry,
    language: Language,
    filename: &str,
    text: &str,
) -> Option<bool> {
    if !registry.has_parser(language) {
        return None;
    }
    match registry.parse(language, text) {
        Ok(parsed) => Some(!parsed.has_errors()),
        Err(e) => {
            tracing::debug!(file = filename, "grammar validation failed: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "tree-sitter"))]
fn grammar_check(
    _registry: &GrammarRegistry,
    _language: Language,
    _filename: &str,
    _text: &str,
) -> Option<bool> {
    None
}

/// Whether every document in `text` parses as YAML.
fn yaml_is_well_formed(filename: &str, text: &str) -> bool {
    for document in serde_yaml::Deserializer::from_str(text) {
        if let Err(e) = serde_yaml::Value::deserialize(document) {
            tracing::debug!(file = filename, "yaml parse error: {}", e);
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;

    fn pattern_only() -> GrammarRegistry {
        GrammarRegistry::disabled()
    }

    #[test]
    fn test_invalid_yaml_uses_structured_fallback() {
        let v = validate_syntax(
            &pattern_only(),
            ".kitchen.yml",
            "driver: [vagrant\nsuites: {a: 1\n",
        );
        assert!(!v.valid);
        assert_eq!(v.detected_language, Language::Yaml);
        assert_eq!(v.method, ValidationMethod::StructuredFallback);
    }

    #[test]
    fn test_valid_yaml() {
        let text = "---\ndriver:\n  name: vagrant\nplatforms:\n  - name: ubuntu-22.04\n";
        let v = validate_syntax(&pattern_only(), ".kitchen.yml", text);
        assert!(v.valid);
        assert_eq!(v.method, ValidationMethod::StructuredFallback);
    }

    #[test]
    fn test_multi_document_yaml() {
        let text = "---\na: 1\n---\nb: 2\n";
        assert!(validate_syntax(&pattern_only(), "docs.yaml", text).valid);
        let broken = "---\na: 1\n---\nb: [2\n";
        assert!(!validate_syntax(&pattern_only(), "docs.yaml", broken).valid);
    }

    #[test]
    fn test_disabled_registry_is_optimistic_for_ruby() {
        let v = validate_syntax(&pattern_only(), "recipes/default.rb", "package \"x\" do\n");
        assert!(v.valid);
        assert_eq!(v.detected_language, Language::Ruby);
        assert_eq!(v.method, ValidationMethod::Optimistic);
    }

    #[test]
    fn test_unknown_language_is_optimistic() {
        let v = validate_syntax(&pattern_only(), "README.md", "# readme {{{");
        assert!(v.valid);
        assert_eq!(v.detected_language, Language::Unknown);
        assert_eq!(v.method, ValidationMethod::Optimistic);
    }

    #[test]
    fn test_undecodable_verdict() {
        let v = undecodable("files/logo.png");
        assert!(v.valid);
        assert_eq!(v.method, ValidationMethod::Optimistic);
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_grammar_validation_for_ruby() {
        let config = ExtractorConfig {
            supported_languages: vec![Language::Ruby],
            ..ExtractorConfig::default()
        };
        let registry = GrammarRegistry::new(&config);

        let ok = validate_syntax(
            &registry,
            "default.rb",
            "package \"httpd\" do\n  action :install\nend\n",
        );
        assert!(ok.valid);
        assert_eq!(ok.method, ValidationMethod::Grammar);

        let broken = validate_syntax(
            &registry,
            "default.rb",
            "package \"httpd\" do\n  action :install\n",
        );
        assert!(!broken.valid);
        assert_eq!(broken.method, ValidationMethod::Grammar);

        // No YAML grammar loaded: YAML still gets the structural check.
        let yaml = validate_syntax(&registry, "site.yml", "a: [1\n");
        assert_eq!(yaml.method, ValidationMethod::StructuredFallback);
    }
}
