//! Cookfacts - fact extraction for Chef cookbooks.
//!
//! Cookfacts reads the files of a cookbook and produces a fact set: the
//! resources declared, the dependencies referenced, cookbook metadata and
//! the syntactic validity of every file. It does not execute or interpret
//! the cookbook; the facts feed downstream analysis.
//!
//! # Architecture
//!
//! Extraction is grammar-first with a deterministic regex fallback:
//!
//! - `grammar`: tree-sitter grammars loaded once per registry
//! - `syntax`: closed node-kind model and visitor walk over parsed trees
//! - `extract`: resource, reference and metadata extraction per file
//! - `validate`: per-file syntax verdicts
//! - `aggregate`: merges per-file results into one deduplicated `FactSet`
//! - `report`: output formatting (text, JSON)
//!
//! # Example
//!
//! ```no_run
//! use cookfacts::{Extractor, ExtractorConfig, SourceFile};
//!
//! let extractor = Extractor::new(ExtractorConfig::default());
//! let facts = extractor.extract(&[
//!     SourceFile::new("metadata.rb", "name \"apache\"\ndepends \"apt\"\n"),
//!     SourceFile::new("recipes/default.rb", "package \"httpd\"\n"),
//! ]);
//! assert_eq!(facts.resources.packages, vec!["httpd"]);
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod facts;
pub mod grammar;
pub mod language;
pub mod report;
#[cfg(feature = "tree-sitter")]
pub mod syntax;
pub mod validate;

pub use aggregate::Extractor;
pub use config::ExtractorConfig;
pub use error::{ExtractionError, GrammarError};
pub use extract::{Metadata, ResourceCategory, Resources};
pub use facts::{
    Dependencies, ExtractionMethod, ExtractorStatus, FactSet, SourceFile, Summary, SyntaxVerdict,
    ValidationMethod, EXTRACTOR_VERSION,
};
pub use grammar::GrammarRegistry;
pub use language::{detect_language, Language};
pub use validate::validate_syntax;
