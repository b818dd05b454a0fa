//! # Breviary
//!
//! A static site generator for a bilingual devotional article archive
//! (dubia.cc). The content tree is the data source: pre-parsed article
//! documents, a tag catalog, an author directory, and a devotional prayer
//! table go in; a complete static HTML tree comes out.
//!
//! # Architecture: Load, Generate, Write
//!
//! The pipeline has three phases with a strict boundary between rendering
//! and I/O:
//!
//! ```text
//! 1. Load      content/   →  LoadedArticles + Catalog + Authors + DevotionalTable
//! 2. Generate  inputs     →  GeneratedSite  (in-memory path → HTML map)
//! 3. Write     site       →  dist/          (plain files, no server needed)
//! ```
//!
//! Generation itself is two-phase: article pages render in parallel (each
//! page depends only on its own document), then the cross-article indexes
//! (topics, newest) are recorded sequentially and the aggregate pages are
//! emitted from them. Keeping the generated site in memory until the end
//! means tests can assert on complete sites without touching the
//! filesystem, and a failed run never leaves a half-written output tree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Reads the content tree: article documents, tag catalog, authors, devotional table |
//! | [`types`] | The article document model shared across all stages |
//! | [`locale`] | Language pairs, localized route segments, and the UI label table |
//! | [`richtext`] | Inline span rendering: style wrapping, links, dropcaps |
//! | [`assemble`] | Token-template page assembly: head, navigation, metadata, TOC, body |
//! | [`rosary`] | The rosary navigation chain: 198 linked prayer blocks from a 15x10 table |
//! | [`special`] | Curated page sections (link lists, text blocks, shop tiles) and the author directory page |
//! | [`index`] | Cross-article tag and date indexes behind the topics and newest pages |
//! | [`artifacts`] | Search index JSON and the generated `.gitignore` |
//! | [`generate`] | The pipeline: renders every page and resolves the root href last |
//! | [`config`] | `config.toml` loading, validation, and stock defaults |
//! | [`output`] | CLI output formatting for build and check reports |
//!
//! # Design Decisions
//!
//! ## Tokens Over a Template Engine
//!
//! The page shell is plain HTML with `$$TOKEN$$` placeholders rather than a
//! Handlebars or Tera layer. The shell changes rarely and carries no logic;
//! every token is verified to occur exactly once at startup, so a typo in a
//! template fails the whole run instead of shipping a broken page. Dynamic
//! fragments (TOC, tag chips, curated sections) are built with
//! [Maud](https://maud.lambda.xyz/), where interpolation is type-checked
//! and auto-escaped.
//!
//! ## Late Root-Href Resolution
//!
//! Every internal link is rendered against the `$$ROOT_HREF$$` token and
//! resolved in one pass at the very end of generation. Development and
//! production builds differ in exactly one string substitution, and no
//! renderer needs to know which build it is part of.
//!
//! ## Fail Fast on Editorial Errors
//!
//! An unknown tag, an unknown author id, or a dropcap landing on a quote
//! character aborts the run with the offending slug. These are authoring
//! mistakes that would otherwise publish silently broken pages. Missing
//! article files are only tolerated in development builds, where an author
//! is mid-edit.

pub mod artifacts;
pub mod assemble;
pub mod config;
pub mod generate;
pub mod index;
pub mod load;
pub mod locale;
pub mod output;
pub mod richtext;
pub mod rosary;
pub mod special;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
