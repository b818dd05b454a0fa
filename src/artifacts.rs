//! Auxiliary data products: the search index and the ignore list.
//!
//! Both are derived from the loaded articles and rewritten on every run.
//! The search index is one JSON file per language, consumed by the
//! client-side search script; it carries the build version plus a content
//! hash per article so the script can invalidate its cache entry by entry.

use crate::types::Document;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

pub fn sha256_hex(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Serialize)]
pub struct SearchEntry {
    pub title: String,
    pub sha256: String,
}

/// Per-language search index, written to `<lang>/index.json`.
#[derive(Debug, Serialize)]
pub struct SearchIndex {
    /// The version string of the build that wrote this index.
    pub git: String,
    pub articles: BTreeMap<String, SearchEntry>,
}

/// Build the search index for one language's articles.
pub fn search_index(
    version: &str,
    articles: &BTreeMap<String, Document>,
) -> Result<SearchIndex, serde_json::Error> {
    let mut entries = BTreeMap::new();
    for (slug, doc) in articles {
        let serialized = serde_json::to_string(doc)?;
        entries.insert(
            slug.clone(),
            SearchEntry {
                title: doc.title.clone(),
                sha256: sha256_hex(&serialized),
            },
        );
    }

    Ok(SearchIndex {
        git: version.to_string(),
        articles: entries,
    })
}

/// `.gitignore` content covering every generated artifact: the per-language
/// output directories plus one entry per article page. Entries are
/// deduplicated and sorted so reruns never reorder the file.
pub fn ignore_list(langs: &BTreeMap<String, BTreeMap<String, Document>>) -> String {
    let mut entries = BTreeSet::new();
    for (lang, articles) in langs {
        entries.insert(format!("/{lang}"));
        for slug in articles.keys() {
            entries.insert(format!("{lang}/{slug}.html"));
        }
    }
    entries.insert("*.md.json".to_string());
    entries.insert("index.html".to_string());
    entries.insert(".DS_Store".to_string());
    entries.into_iter().collect::<Vec<_>>().join("\n")
}
