//! Output formatting for cookfacts results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the fact set as-is, for programmatic consumption

use colored::*;

use crate::extract::ResourceCategory;
use crate::facts::{ExtractorStatus, FactSet, SyntaxVerdict};

/// Write the fact set as pretty-printed JSON.
pub fn write_json(facts: &FactSet) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(facts)?);
    Ok(())
}

/// Write registry status as JSON.
pub fn write_status(status: &ExtractorStatus) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(status)?);
    Ok(())
}

/// Write the fact set in human-readable form.
pub fn write_pretty(path: &str, facts: &FactSet) {
    println!();
    println!("  {}  {}", "cookfacts".bold(), path.blue());
    write_status_line(facts);
    println!();

    write_metadata(facts);
    write_resources(facts);
    write_dependencies(facts);
    write_invalid_files(facts);

    write_final_status(facts);
    println!();
}

fn write_status_line(facts: &FactSet) {
    let grammar = if facts.status.enabled {
        let langs: Vec<_> = facts
            .status
            .parsers_loaded
            .iter()
            .map(|l| l.as_str())
            .collect();
        format!("grammars: {}", langs.join(", ")).green()
    } else {
        "grammars: none (pattern-only)".yellow()
    };
    println!(
        "  {}  {}",
        grammar,
        format!(
            "method: {} ({} grammar / {} pattern files)",
            facts.summary.extraction_method,
            facts.summary.grammar_files,
            facts.summary.pattern_files
        )
        .dimmed()
    );
}

fn write_metadata(facts: &FactSet) {
    let m = &facts.metadata;
    if m.is_empty() {
        return;
    }
    println!("  {}", "Metadata:".bold());
    let fields = [
        ("name", &m.name),
        ("version", &m.version),
        ("description", &m.description),
        ("maintainer", &m.maintainer),
        ("license", &m.license),
        ("chef_version", &m.chef_version),
    ];
    for (label, value) in fields {
        if let Some(v) = value {
            write_row(label, v);
        }
    }
    if !m.supports.is_empty() {
        write_row("supports", &m.supports.join(", "));
    }
    println!();
}

fn write_resources(facts: &FactSet) {
    println!(
        "  {} ({}):",
        "Resources".bold(),
        facts.summary.total_resources
    );
    for category in ResourceCategory::ALL {
        let items = facts.resources.get(category);
        if items.is_empty() {
            continue;
        }
        write_row(category.as_str(), &items.join(", "));
    }
    println!();
}

fn write_dependencies(facts: &FactSet) {
    let deps = &facts.dependencies;
    println!(
        "  {} ({}):",
        "Dependencies".bold(),
        facts.summary.total_dependencies
    );
    if !deps.declared.is_empty() {
        write_row("declared", &deps.declared.join(", "));
    }
    if !deps.referenced.is_empty() {
        write_row("referenced", &deps.referenced.join(", "));
    }
    println!();
}

fn write_row(label: &str, value: &str) {
    println!("    {:<14} {}", label.dimmed(), value);
}

fn write_invalid_files(facts: &FactSet) {
    let invalid: Vec<&SyntaxVerdict> = facts.invalid_files().collect();
    if invalid.is_empty() {
        return;
    }
    println!("  {} ({}):", "Syntax errors".bold(), invalid.len());
    for v in invalid {
        println!(
            "    {} {}  {}",
            "ERROR".red(),
            v.file.blue(),
            format!("{} via {}", v.detected_language, v.method).dimmed()
        );
    }
    println!();
}

fn write_final_status(facts: &FactSet) {
    print!(
        "  {}",
        format!("{} files", facts.summary.files_processed).dimmed()
    );
    print!("  ");
    if facts.all_valid() {
        print!("{}", "ALL VALID".green());
    } else {
        print!("{}", "SYNTAX ERRORS".red());
    }
    println!();
}
