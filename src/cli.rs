//! Command-line interface for cookfacts.

use anyhow::Context;
use clap::{Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::aggregate::Extractor;
use crate::config::{self, ExtractorConfig};
use crate::facts::SourceFile;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INVALID: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// File extensions collected from a cookbook tree.
const COOKBOOK_EXTENSIONS: &[&str] = &["rb", "yml", "yaml"];

/// Extract resources, dependencies and metadata from Chef cookbooks.
///
/// Cookfacts parses recipes with tree-sitter where it can and falls back to
/// pattern matching where it cannot, then reports a deduplicated fact set
/// together with per-file syntax verdicts.
#[derive(Parser)]
#[command(name = "cookfacts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract facts from a cookbook directory or file
    Extract(ExtractArgs),
    /// Show grammar availability
    Status(StatusArgs),
}

/// Arguments for the extract command.
#[derive(Parser)]
pub struct ExtractArgs {
    /// Cookbook directory or single file
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Glob patterns (relative to PATH) to leave out
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Parse files in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the status command.
#[derive(Parser)]
pub struct StatusArgs {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn load_config(explicit: Option<&Path>) -> ExtractorConfig {
    let path = explicit.map(Path::to_path_buf).or_else(config::discover);
    ExtractorConfig::load_or_default(path.as_deref())
}

fn build_excludes(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("invalid exclude {:?}", pattern))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect cookbook files under `root`, sorted by path.
///
/// Names are relative to `root` with `/` separators, so `metadata.rb` at the
/// cookbook root is recognized as the metadata file.
pub fn collect_files(root: &Path, excludes: &GlobSet) -> anyhow::Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden directories
            let hidden = e.depth() > 0 && e.file_name().to_string_lossy().starts_with('.');
            !(e.file_type().is_dir() && hidden)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !COOKBOOK_EXTENSIONS.contains(&ext) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if excludes.is_match(&name) {
            continue;
        }

        let content = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        files.push(SourceFile::new(name, content));
    }

    Ok(files)
}

/// Run the extract command.
pub fn run_extract(args: &ExtractArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = load_config(args.config.as_deref());
    let excludes = build_excludes(&args.exclude)?;

    let metadata = std::fs::metadata(&args.path)
        .with_context(|| format!("cannot access path {:?}", args.path))?;

    let files = if metadata.is_dir() {
        collect_files(&args.path, &excludes)?
    } else {
        let name = args
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        vec![SourceFile::new(name, std::fs::read(&args.path)?)]
    };

    if files.is_empty() {
        tracing::warn!("no cookbook files found under {}", args.path.display());
    }

    let extractor = Extractor::new(config);
    let facts = if args.parallel {
        extractor.extract_parallel(&files)
    } else {
        extractor.extract(&files)
    };

    let path_str = args.path.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_json(&facts)?,
        _ => report::write_pretty(&path_str, &facts),
    }

    if facts.all_valid() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_INVALID)
    }
}

/// Run the status command.
pub fn run_status(args: &StatusArgs) -> anyhow::Result<i32> {
    let config = load_config(args.config.as_deref());
    let extractor = Extractor::new(config);
    report::write_status(&extractor.status())?;
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collect_files_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "recipes/default.rb", "package \"httpd\"\n");
        write(root, "metadata.rb", "name \"apache\"\n");
        write(root, "attributes/default.rb", "default['port'] = 80\n");
        write(root, ".kitchen.yml", "driver:\n  name: vagrant\n");
        write(root, ".git/config.yml", "ignored: true\n");
        write(root, "templates/httpd.conf.erb", "Listen <%= @port %>\n");
        write(root, "README.md", "# apache\n");
        write(root, "metadata.json", "{\"name\": \"package apache\"}\n");

        let files = collect_files(root, &build_excludes(&[]).unwrap()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                ".kitchen.yml",
                "attributes/default.rb",
                "metadata.rb",
                "recipes/default.rb"
            ]
        );
    }

    #[test]
    fn test_collect_files_excludes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "recipes/default.rb", "package \"httpd\"\n");
        write(
            root,
            "test/integration/default_test.rb",
            "describe package('httpd')\n",
        );

        let excludes = build_excludes(&["test/**".to_string()]).unwrap();
        let files = collect_files(root, &excludes).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "recipes/default.rb");
    }

    #[test]
    fn test_invalid_exclude_is_an_error() {
        assert!(build_excludes(&["[unclosed".to_string()]).is_err());
    }

    fn extract_args(path: &Path, format: &str) -> ExtractArgs {
        ExtractArgs {
            path: path.to_path_buf(),
            config: None,
            format: format.to_string(),
            exclude: Vec::new(),
            parallel: false,
        }
    }

    fn valid_cookbook(root: &Path) {
        write(root, "metadata.rb", "name \"web\"\ndepends \"apt\"\n");
        write(
            root,
            "recipes/default.rb",
            "package \"nginx\" do\n  action :install\nend\n",
        );
    }

    #[test]
    fn test_run_extract_all_valid() {
        let temp = TempDir::new().unwrap();
        valid_cookbook(temp.path());
        let code = run_extract(&extract_args(temp.path(), "json")).unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    fn test_run_extract_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        valid_cookbook(temp.path());
        write(temp.path(), "kitchen.yml", "driver: [vagrant\n");
        let code = run_extract(&extract_args(temp.path(), "json")).unwrap();
        assert_eq!(code, EXIT_INVALID);
    }

    #[test]
    fn test_run_extract_unknown_format() {
        let temp = TempDir::new().unwrap();
        valid_cookbook(temp.path());
        let code = run_extract(&extract_args(temp.path(), "xml")).unwrap();
        assert_eq!(code, EXIT_ERROR);
    }

    #[test]
    fn test_run_extract_single_file() {
        let temp = TempDir::new().unwrap();
        valid_cookbook(temp.path());
        let recipe = temp.path().join("recipes/default.rb");
        let code = run_extract(&extract_args(&recipe, "pretty")).unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    fn test_run_extract_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("no-such-cookbook");
        assert!(run_extract(&extract_args(&missing, "json")).is_err());
    }
}
