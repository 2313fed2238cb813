//! Syntax tree model used by the extractors.
//!
//! Grammar nodes are classified into a small closed set of kinds the
//! extractors care about, and traversal goes through the [`Visitor`] trait
//! instead of inspecting node kinds ad hoc at every call site.

use tree_sitter::{Node, Tree};

use crate::language::Language;

/// Maximum depth below a call node searched for its identifying string.
///
/// Resource declarations put the name first; searching deeper starts
/// picking up literals from nested blocks such as `variables(...)`.
pub const MAX_ARGUMENT_DEPTH: usize = 3;

/// A parsed file and the text it was parsed from.
pub struct ParsedFile {
    pub tree: Tree,
    pub source: String,
    pub language: Language,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Whether the tree contains ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// S-expression rendering of the tree.
    pub fn sexp(&self) -> String {
        self.tree.root_node().to_sexp()
    }
}

/// Node kinds relevant to fact extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Method call or command (`package "x"`, `include_recipe "a::b"`).
    CallSite,
    Identifier,
    StringLiteral,
    Other,
}

impl NodeKind {
    /// Classify a concrete grammar node.
    pub fn of(node: &Node) -> Self {
        match node.kind() {
            "call" | "method_call" | "command" | "command_call" => NodeKind::CallSite,
            "identifier" => NodeKind::Identifier,
            "string" => NodeKind::StringLiteral,
            _ => NodeKind::Other,
        }
    }
}

/// Callback interface for a depth-first walk.
pub trait Visitor<'tree> {
    fn visit(&mut self, node: Node<'tree>, kind: NodeKind, parsed: &'tree ParsedFile);
}

/// Visit every node of the tree in depth-first pre-order.
///
/// Uses a cursor rather than recursion, so deeply nested files cannot
/// exhaust the stack.
pub fn walk<'tree, V: Visitor<'tree>>(parsed: &'tree ParsedFile, visitor: &mut V) {
    let mut cursor = parsed.tree.walk();
    loop {
        let node = cursor.node();
        visitor.visit(node, NodeKind::of(&node), parsed);

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Name of the method invoked at a call site: its first identifier child.
pub fn call_method_name<'tree>(
    node: Node<'tree>,
    parsed: &'tree ParsedFile,
) -> Option<&'tree str> {
    let mut cursor = node.walk();
    let ident = node
        .children(&mut cursor)
        .find(|c| NodeKind::of(c) == NodeKind::Identifier)?;
    Some(parsed.node_text(ident))
}

/// First non-empty string literal within [`MAX_ARGUMENT_DEPTH`] of `node`.
pub fn first_string_argument(node: Node, parsed: &ParsedFile) -> Option<String> {
    find_string(node, parsed, 0)
}

fn find_string(node: Node, parsed: &ParsedFile, depth: usize) -> Option<String> {
    if depth > MAX_ARGUMENT_DEPTH {
        return None;
    }
    if NodeKind::of(&node) == NodeKind::StringLiteral {
        let value = string_value(node, parsed);
        if !value.is_empty() {
            return Some(value);
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(value) = find_string(child, parsed, depth + 1) {
            return Some(value);
        }
    }
    None
}

/// Unquoted text of a string literal.
fn string_value(node: Node, parsed: &ParsedFile) -> String {
    let mut cursor = node.walk();
    let content = node
        .children(&mut cursor)
        .find(|c| c.kind().contains("content"));
    match content {
        Some(c) => parsed.node_text(c).to_string(),
        None => parsed
            .node_text(node)
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::grammar::GrammarRegistry;

    fn parse_ruby(source: &str) -> ParsedFile {
        let config = ExtractorConfig {
            supported_languages: vec![Language::Ruby],
            ..ExtractorConfig::default()
        };
        GrammarRegistry::new(&config)
            .parse(Language::Ruby, source)
            .expect("ruby should parse")
    }

    fn call(name: &str, argument: Option<&str>) -> (String, Option<String>) {
        (name.to_string(), argument.map(str::to_string))
    }

    /// Records every call site with its method name and first string.
    #[derive(Default)]
    struct Calls(Vec<(String, Option<String>)>);

    impl<'tree> Visitor<'tree> for Calls {
        fn visit(&mut self, node: Node<'tree>, kind: NodeKind, parsed: &'tree ParsedFile) {
            if kind != NodeKind::CallSite {
                return;
            }
            if let Some(name) = call_method_name(node, parsed) {
                let argument = first_string_argument(node, parsed);
                self.0.push((name.to_string(), argument));
            }
        }
    }

    #[test]
    fn test_walk_finds_nested_calls() {
        let parsed = parse_ruby(
            r#"
package "httpd" do
  action :install
end

if platform?("centos")
  service "httpd" do
    action :start
  end
end
"#,
        );
        let mut calls = Calls::default();
        walk(&parsed, &mut calls);

        assert!(calls.0.contains(&call("package", Some("httpd"))));
        assert!(calls.0.contains(&call("service", Some("httpd"))));
    }

    #[test]
    fn test_single_quoted_string() {
        let parsed = parse_ruby("include_recipe 'apache::ssl'\n");
        let mut calls = Calls::default();
        walk(&parsed, &mut calls);
        assert_eq!(calls.0, vec![call("include_recipe", Some("apache::ssl"))]);
    }

    #[test]
    fn test_call_without_string_yields_none() {
        let parsed = parse_ruby("pkg_name = 'httpd'\npackage pkg_name\n");
        let mut calls = Calls::default();
        walk(&parsed, &mut calls);
        let package = calls.0.iter().find(|(name, _)| name == "package");
        assert_eq!(package, Some(&call("package", None)));
    }

    #[test]
    fn test_argument_search_depth_limit() {
        // call > argument_list > array > string sits at the limit;
        // one more array level puts the literal out of reach.
        let parsed = parse_ruby("package [\"d3\"]\npackage [[\"d4\"]]\n");
        let mut calls = Calls::default();
        walk(&parsed, &mut calls);
        assert_eq!(
            calls.0,
            vec![call("package", Some("d3")), call("package", None)]
        );
    }

    #[test]
    fn test_sexp_rendering() {
        let parsed = parse_ruby("package \"httpd\"\n");
        assert!(parsed.sexp().starts_with("(program"));
    }
}
