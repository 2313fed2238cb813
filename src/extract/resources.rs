//! Resource taxonomy and the AST resource walker.

use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categories of resource declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Packages,
    Services,
    Files,
    Templates,
    Directories,
    Users,
    Groups,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 7] = [
        ResourceCategory::Packages,
        ResourceCategory::Services,
        ResourceCategory::Files,
        ResourceCategory::Templates,
        ResourceCategory::Directories,
        ResourceCategory::Users,
        ResourceCategory::Groups,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Packages => "packages",
            ResourceCategory::Services => "services",
            ResourceCategory::Files => "files",
            ResourceCategory::Templates => "templates",
            ResourceCategory::Directories => "directories",
            ResourceCategory::Users => "users",
            ResourceCategory::Groups => "groups",
        }
    }

    /// Category for a resource DSL keyword, if it is one we track.
    pub fn for_keyword(keyword: &str) -> Option<Self> {
        RESOURCE_KEYWORDS.get(keyword).copied()
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// DSL keyword -> category. Extending the taxonomy means extending this
/// table and the fallback patterns together.
static RESOURCE_KEYWORDS: phf::Map<&'static str, ResourceCategory> = phf_map! {
    "package" => ResourceCategory::Packages,
    "service" => ResourceCategory::Services,
    "file" => ResourceCategory::Files,
    "cookbook_file" => ResourceCategory::Files,
    "remote_file" => ResourceCategory::Files,
    "template" => ResourceCategory::Templates,
    "directory" => ResourceCategory::Directories,
    "user" => ResourceCategory::Users,
    "group" => ResourceCategory::Groups,
};

/// Resource identifiers grouped by category, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub packages: Vec<String>,
    pub services: Vec<String>,
    pub files: Vec<String>,
    pub templates: Vec<String>,
    pub directories: Vec<String>,
    pub users: Vec<String>,
    pub groups: Vec<String>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: ResourceCategory) -> &[String] {
        match category {
            ResourceCategory::Packages => &self.packages,
            ResourceCategory::Services => &self.services,
            ResourceCategory::Files => &self.files,
            ResourceCategory::Templates => &self.templates,
            ResourceCategory::Directories => &self.directories,
            ResourceCategory::Users => &self.users,
            ResourceCategory::Groups => &self.groups,
        }
    }

    fn get_mut(&mut self, category: ResourceCategory) -> &mut Vec<String> {
        match category {
            ResourceCategory::Packages => &mut self.packages,
            ResourceCategory::Services => &mut self.services,
            ResourceCategory::Files => &mut self.files,
            ResourceCategory::Templates => &mut self.templates,
            ResourceCategory::Directories => &mut self.directories,
            ResourceCategory::Users => &mut self.users,
            ResourceCategory::Groups => &mut self.groups,
        }
    }

    pub fn push(&mut self, category: ResourceCategory, identifier: impl Into<String>) {
        self.get_mut(category).push(identifier.into());
    }

    /// Append every category of `other` after this one's entries.
    pub fn extend(&mut self, other: Resources) {
        let Resources {
            packages,
            services,
            files,
            templates,
            directories,
            users,
            groups,
        } = other;
        self.packages.extend(packages);
        self.services.extend(services);
        self.files.extend(files);
        self.templates.extend(templates);
        self.directories.extend(directories);
        self.users.extend(users);
        self.groups.extend(groups);
    }

    /// Total identifiers across all categories.
    pub fn total(&self) -> usize {
        ResourceCategory::ALL
            .iter()
            .map(|c| self.get(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Drop repeated identifiers per category, keeping first occurrences.
    pub fn dedup(&mut self) {
        for category in ResourceCategory::ALL {
            crate::facts::dedup_stable(self.get_mut(category));
        }
    }
}

#[cfg(feature = "tree-sitter")]
pub use walker::ResourceWalker;

#[cfg(feature = "tree-sitter")]
mod walker {
    use tree_sitter::Node;

    use super::{ResourceCategory, Resources};
    use crate::syntax::{call_method_name, first_string_argument, NodeKind, ParsedFile, Visitor};

    /// Collects resource declarations from a parsed recipe.
    #[derive(Debug, Default)]
    pub struct ResourceWalker {
        resources: Resources,
    }

    impl ResourceWalker {
        pub fn new() -> Self {
            Self::default()
        }

        /// Walk `parsed` and return what was found.
        pub fn collect(parsed: &ParsedFile) -> Resources {
            let mut walker = Self::new();
            crate::syntax::walk(parsed, &mut walker);
            walker.resources
        }
    }

    impl<'tree> Visitor<'tree> for ResourceWalker {
        fn visit(&mut self, node: Node<'tree>, kind: NodeKind, parsed: &'tree ParsedFile) {
            if kind != NodeKind::CallSite {
                return;
            }
            let name = call_method_name(node, parsed);
            let Some(category) = name.and_then(ResourceCategory::for_keyword) else {
                return;
            };
            // Declarations without a literal name are skipped.
            if let Some(identifier) = first_string_argument(node, parsed) {
                self.resources.push(category, identifier);
            }
        }
    }
}
