//! Cross-file references (`include_recipe`).

/// DSL call that pulls another recipe into the run list.
pub const INCLUDE_KEYWORD: &str = "include_recipe";

#[cfg(feature = "tree-sitter")]
pub use walker::ReferenceWalker;

#[cfg(feature = "tree-sitter")]
mod walker {
    use tree_sitter::Node;

    use super::INCLUDE_KEYWORD;
    use crate::syntax::{call_method_name, first_string_argument, NodeKind, ParsedFile, Visitor};

    /// Collects `include_recipe` targets from a parsed recipe.
    #[derive(Debug, Default)]
    pub struct ReferenceWalker {
        references: Vec<String>,
    }

    impl ReferenceWalker {
        pub fn collect(parsed: &ParsedFile) -> Vec<String> {
            let mut walker = Self::default();
            crate::syntax::walk(parsed, &mut walker);
            walker.references
        }
    }

    impl<'tree> Visitor<'tree> for ReferenceWalker {
        fn visit(&mut self, node: Node<'tree>, kind: NodeKind, parsed: &'tree ParsedFile) {
            if kind == NodeKind::CallSite && call_method_name(node, parsed) == Some(INCLUDE_KEYWORD)
            {
                if let Some(target) = first_string_argument(node, parsed) {
                    self.references.push(target);
                }
            }
        }
    }
}

#[cfg(test)]
#[cfg(feature = "tree-sitter")]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::grammar::GrammarRegistry;
    use crate::language::Language;

    #[test]
    fn test_collects_includes_in_order() {
        let registry = GrammarRegistry::new(&ExtractorConfig::default());
        let parsed = registry
            .parse(
                Language::Ruby,
                r#"
include_recipe "apache::ssl"
if node['apache']['rewrite']
  include_recipe 'apache::mod_rewrite'
end
include_recipe extra_recipe
"#,
            )
            .unwrap();

        assert_eq!(
            ReferenceWalker::collect(&parsed),
            vec!["apache::ssl", "apache::mod_rewrite"]
        );
    }
}
