//! Per-file fact extraction.
//!
//! Resources and `include_recipe` references are extracted grammar-first:
//! the grammar walk is used when it finds something, and the regex fallback
//! otherwise. An empty walk is not trusted, since patterns can still find
//! facts the grammar shape missed. Metadata always goes through regexes.

mod dependencies;
mod metadata;
mod patterns;
mod resources;

pub use dependencies::INCLUDE_KEYWORD;
pub use metadata::{extract_metadata, Metadata, MetadataFacts};
pub use patterns::{match_references, match_resources};
pub use resources::{ResourceCategory, Resources};

#[cfg(feature = "tree-sitter")]
pub use dependencies::ReferenceWalker;
#[cfg(feature = "tree-sitter")]
pub use resources::ResourceWalker;

use crate::error::ExtractionError;
use crate::facts::ExtractionMethod;
use crate::grammar::GrammarRegistry;
use crate::language::Language;

/// Facts from one resource-bearing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExtraction {
    pub resources: Resources,
    pub references: Vec<String>,
    /// Where `resources` came from.
    pub method: ExtractionMethod,
    /// S-expression of the parsed tree, if requested and parsing succeeded.
    pub sexp: Option<String>,
}

/// Raw output of a grammar walk.
struct AstFacts {
    resources: Resources,
    references: Vec<String>,
    sexp: Option<String>,
}

#[cfg(feature = "tree-sitter")]
fn extract_ast(
    registry: &GrammarRegistry,
    language: Language,
    text: &str,
    with_sexp: bool,
) -> Result<AstFacts, ExtractionError> {
    if !registry.is_enabled() {
        return Err(ExtractionError::GrammarUnavailable(language));
    }
    let parsed = registry.parse(language, text)?;
    Ok(AstFacts {
        resources: ResourceWalker::collect(&parsed),
        references: ReferenceWalker::collect(&parsed),
        sexp: with_sexp.then(|| parsed.sexp()),
    })
}

#[cfg(not(feature = "tree-sitter"))]
fn extract_ast(
    _registry: &GrammarRegistry,
    language: Language,
    _text: &str,
    _with_sexp: bool,
) -> Result<AstFacts, ExtractionError> {
    Err(ExtractionError::GrammarUnavailable(language))
}

/// Extract resources and references from one file.
///
/// Never fails: grammar errors select the pattern fallback.
pub fn extract_file(
    registry: &GrammarRegistry,
    filename: &str,
    language: Language,
    text: &str,
    with_sexp: bool,
) -> FileExtraction {
    let ast = match extract_ast(registry, language, text, with_sexp) {
        Ok(facts) => Some(facts),
        Err(e) => {
            tracing::debug!(file = filename, "grammar extraction unavailable: {}", e);
            None
        }
    };

    let (ast_resources, ast_references, sexp) = match ast {
        Some(facts) => (Some(facts.resources), Some(facts.references), facts.sexp),
        None => (None, None, None),
    };

    let (resources, method) = match ast_resources {
        Some(r) if !r.is_empty() => (r, ExtractionMethod::Grammar),
        _ => {
            tracing::debug!(file = filename, "using pattern fallback for resources");
            (match_resources(text), ExtractionMethod::Pattern)
        }
    };

    let references = match ast_references {
        Some(r) if !r.is_empty() => r,
        _ => match_references(text),
    };

    FileExtraction {
        resources,
        references,
        method,
        sexp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;

    const RECIPE: &str = r#"
package "httpd" do
  action :install
end
package "httpd-devel" do
  action :install
end
service "httpd" do
  action [:enable, :start]
end
include_recipe "apache::ssl"
"#;

    #[test]
    fn test_disabled_registry_uses_patterns() {
        let registry = GrammarRegistry::disabled();
        let out = extract_file(&registry, "default.rb", Language::Ruby, RECIPE, true);
        assert_eq!(out.method, ExtractionMethod::Pattern);
        assert_eq!(out.resources.packages, vec!["httpd", "httpd-devel"]);
        assert_eq!(out.references, vec!["apache::ssl"]);
        assert!(out.sexp.is_none());
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_grammar_preferred_when_non_empty() {
        let registry = GrammarRegistry::new(&ExtractorConfig::default());
        let out = extract_file(&registry, "default.rb", Language::Ruby, RECIPE, true);
        assert_eq!(out.method, ExtractionMethod::Grammar);
        assert_eq!(out.resources.packages, vec!["httpd", "httpd-devel"]);
        assert_eq!(out.resources.services, vec!["httpd"]);
        assert_eq!(out.references, vec!["apache::ssl"]);
        assert!(out.sexp.is_some());
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_empty_walk_falls_back_to_patterns() {
        let registry = GrammarRegistry::new(&ExtractorConfig::default());
        // Only a comment: the walk finds nothing, the fallback still does.
        let text = "# package \"legacy-tool\"\n";
        let out = extract_file(&registry, "legacy.rb", Language::Ruby, text, false);
        assert_eq!(out.method, ExtractionMethod::Pattern);
        assert_eq!(out.resources.packages, vec!["legacy-tool"]);
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_language_without_parser_uses_patterns() {
        let config = ExtractorConfig {
            supported_languages: vec![Language::Yaml],
            ..ExtractorConfig::default()
        };
        let registry = GrammarRegistry::new(&config);
        let out = extract_file(&registry, "default.rb", Language::Ruby, RECIPE, false);
        assert_eq!(out.method, ExtractionMethod::Pattern);
        assert_eq!(out.resources.total(), 3);
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_grammar_and_patterns_agree_on_canonical_input() {
        let registry = GrammarRegistry::new(&ExtractorConfig::default());
        let text = r#"
package "nginx"
service "nginx"
template "/etc/nginx/nginx.conf"
directory "/var/www"
user "deploy"
group "deploy"
cookbook_file "/etc/motd"
remote_file "/tmp/app.tgz"
file "/etc/app.conf"
"#;
        let ast = extract_file(&registry, "web.rb", Language::Ruby, text, false);
        assert_eq!(ast.method, ExtractionMethod::Grammar);

        let mut patterns = match_resources(text);
        let mut grammar = ast.resources.clone();
        for category in ResourceCategory::ALL {
            let mut a = grammar.get(category).to_vec();
            let mut b = patterns.get(category).to_vec();
            a.sort();
            b.sort();
            assert_eq!(a, b, "category {} differs", category);
        }
        grammar.dedup();
        patterns.dedup();
        assert_eq!(grammar.total(), patterns.total());
    }
}
