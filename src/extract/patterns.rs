//! Regex fallback for resource and reference extraction.
//!
//! Works on raw text with no block or indentation awareness, so it finds
//! declarations anywhere, including in comments. It is the path taken when
//! no grammar is available or the grammar walk comes back empty.

use lazy_static::lazy_static;
use regex::Regex;

use super::resources::{ResourceCategory, Resources};

lazy_static! {
    /// Patterns per category. Matches of all patterns of a category are unioned.
    static ref RESOURCE_PATTERNS: Vec<(ResourceCategory, Vec<Regex>)> = vec![
        (ResourceCategory::Packages, vec![quoted_argument("package")]),
        (ResourceCategory::Services, vec![quoted_argument("service")]),
        (
            ResourceCategory::Files,
            vec![quoted_argument("(?:file|cookbook_file|remote_file)")],
        ),
        (ResourceCategory::Templates, vec![quoted_argument("template")]),
        (ResourceCategory::Directories, vec![quoted_argument("directory")]),
        (ResourceCategory::Users, vec![quoted_argument("user")]),
        (ResourceCategory::Groups, vec![quoted_argument("group")]),
    ];

    static ref INCLUDE_RECIPE_PATTERN: Regex = quoted_argument("include_recipe");
}

/// `<keyword> "<value>"` or `<keyword> '<value>'`, capturing the value.
fn quoted_argument(keyword: &str) -> Regex {
    Regex::new(&format!(r#"{}\s+["']([^"']+)["']"#, keyword))
        .expect("resource keyword pattern is valid")
}

/// All resource declarations matched in `text`, per category.
pub fn match_resources(text: &str) -> Resources {
    let mut resources = Resources::new();
    for (category, patterns) in RESOURCE_PATTERNS.iter() {
        for pattern in patterns {
            for caps in pattern.captures_iter(text) {
                resources.push(*category, &caps[1]);
            }
        }
    }
    resources
}

/// All `include_recipe` targets matched in `text`.
pub fn match_references(text: &str) -> Vec<String> {
    INCLUDE_RECIPE_PATTERN
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}
