//! CLI output formatting.
//!
//! # Output Format
//!
//! The build report groups generated files by their top-level directory
//! (one group per language, plus a `site root` group for files written at
//! the output root), lists every file with a positional index, and closes
//! with a summary line:
//!
//! ```text
//! de
//!     001 de/index.html
//!     002 de/neu.html
//!     003 de/rosenkranz.html
//!         de/index.json
//!
//! en
//!     001 en/index.html
//!     002 en/newest.html
//!         en/index.json
//!
//! site root
//!     .gitignore
//!
//! Warnings
//!     article de/alt has no modification date
//!
//! Generated 5 pages (1 warning)
//! ```
//!
//! Pages (`.html`) get positional indices; auxiliary artifacts are listed
//! unnumbered below them.
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::GeneratedSite;
use std::collections::BTreeMap;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Top-level directory of an output path, or `None` for root-level files.
fn group_of(path: &str) -> Option<&str> {
    path.split_once('/').map(|(group, _)| group)
}

fn pluralize(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Format the build report for a generated site.
pub fn format_build_output(site: &GeneratedSite) -> Vec<String> {
    let mut groups: BTreeMap<Option<&str>, Vec<&str>> = BTreeMap::new();
    for path in site.files.keys() {
        groups.entry(group_of(path)).or_default().push(path);
    }

    let mut lines = Vec::new();

    // Language groups first, root-level files last.
    for (group, paths) in groups.iter().filter(|(g, _)| g.is_some()) {
        lines.push(group.unwrap_or_default().to_string());
        let mut page_pos = 0;
        for path in paths.iter().filter(|p| p.ends_with(".html")) {
            page_pos += 1;
            lines.push(format!("    {} {}", format_index(page_pos), path));
        }
        for path in paths.iter().filter(|p| !p.ends_with(".html")) {
            lines.push(format!("        {path}"));
        }
        lines.push(String::new());
    }

    if let Some(paths) = groups.get(&None) {
        lines.push("site root".to_string());
        for path in paths {
            lines.push(format!("    {path}"));
        }
        lines.push(String::new());
    }

    lines.extend(format_warning_lines(&site.warnings));

    let pages = pluralize(site.page_count(), "page");
    if site.warnings.is_empty() {
        lines.push(format!("Generated {pages}"));
    } else {
        let warnings = pluralize(site.warnings.len(), "warning");
        lines.push(format!("Generated {pages} ({warnings})"));
    }

    lines
}

/// Format a warnings section, or nothing when there are no warnings.
pub fn format_warning_lines(warnings: &[String]) -> Vec<String> {
    if warnings.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["Warnings".to_string()];
    for warning in warnings {
        lines.push(format!("    {warning}"));
    }
    lines.push(String::new());
    lines
}

/// Format the report for a `check` run that loaded cleanly.
pub fn format_check_output(article_count: usize, page_count: usize) -> Vec<String> {
    vec![format!(
        "OK: {} loaded, {} rendered",
        pluralize(article_count, "article"),
        pluralize(page_count, "page"),
    )]
}

/// Print the build report to stdout.
pub fn print_build_output(site: &GeneratedSite) {
    for line in format_build_output(site) {
        println!("{}", line);
    }
}

/// Print the check report to stdout.
pub fn print_check_output(article_count: usize, page_count: usize) {
    for line in format_check_output(article_count, page_count) {
        println!("{}", line);
    }
}
