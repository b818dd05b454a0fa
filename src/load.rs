//! Input loading.
//!
//! The content tree is produced by the authoring toolchain and consumed
//! read-only:
//!
//! ```text
//! content/
//! ├── articles/
//! │   ├── de/
//! │   │   └── <slug>/index.md.json    # pre-parsed article document
//! │   └── en/
//! │       └── <slug>/index.md.json
//! ├── tags.json                       # tag catalog + curated pages
//! ├── authors.json                    # author directory
//! └── mysteries.json                  # devotional table for the rosary
//! ```
//!
//! A slug directory without its `index.md.json` is tolerated with a warning
//! in [`LoadMode::Development`] (the author is mid-edit) and fatal in
//! [`LoadMode::Production`] (pre-publish validation). A file that exists but
//! fails to parse is fatal in both modes.

use crate::rosary::DevotionalTable;
use crate::types::{AuthorDirectory, Catalog, Document};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("article {lang}/{slug} has no index.md.json at {path}")]
    MissingArticle {
        lang: String,
        slug: String,
        path: PathBuf,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fail-fast vs. best-effort handling of incomplete article directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Development,
    Production,
}

/// Non-fatal findings from a development-mode load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadWarning {
    MissingArticle { lang: String, slug: String },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::MissingArticle { lang, slug } => {
                write!(f, "skipping article {lang}/{slug}: no index.md.json")
            }
        }
    }
}

/// Every article document, keyed by language then slug.
#[derive(Debug, Default)]
pub struct LoadedArticles {
    pub langs: BTreeMap<String, BTreeMap<String, Document>>,
    pub warnings: Vec<LoadWarning>,
}

impl LoadedArticles {
    pub fn article_count(&self) -> usize {
        self.langs.values().map(BTreeMap::len).sum()
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Walk `articles/` and load every `<lang>/<slug>/index.md.json`.
pub fn load_articles(articles_dir: &Path, mode: LoadMode) -> Result<LoadedArticles, LoadError> {
    let mut loaded = LoadedArticles::default();

    for entry in WalkDir::new(articles_dir).min_depth(2).max_depth(2) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let slug_dir = entry.path();
        let slug = entry.file_name().to_string_lossy().to_string();
        let lang = slug_dir
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let index_path = slug_dir.join("index.md.json");
        if !index_path.is_file() {
            match mode {
                LoadMode::Production => {
                    return Err(LoadError::MissingArticle {
                        lang,
                        slug,
                        path: index_path,
                    });
                }
                LoadMode::Development => {
                    loaded
                        .warnings
                        .push(LoadWarning::MissingArticle { lang, slug });
                    continue;
                }
            }
        }

        let doc: Document = parse_json(&index_path)?;
        loaded.langs.entry(lang).or_default().insert(slug, doc);
    }

    Ok(loaded)
}

pub fn load_catalog(content_dir: &Path) -> Result<Catalog, LoadError> {
    parse_json(&content_dir.join("tags.json"))
}

pub fn load_authors(content_dir: &Path) -> Result<AuthorDirectory, LoadError> {
    parse_json(&content_dir.join("authors.json"))
}

pub fn load_devotional(content_dir: &Path) -> Result<DevotionalTable, LoadError> {
    parse_json(&content_dir.join("mysteries.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_article(root: &Path, lang: &str, slug: &str, json: &str) {
        let dir = root.join(lang).join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.md.json"), json).unwrap();
    }

    const MINIMAL: &str = r#"{ "title": "T" }"#;

    #[test]
    fn loads_articles_per_language() {
        let tmp = TempDir::new().unwrap();
        write_article(tmp.path(), "de", "rosenkranz", MINIMAL);
        write_article(tmp.path(), "en", "rosary", MINIMAL);
        write_article(tmp.path(), "en", "creed", MINIMAL);

        let loaded = load_articles(tmp.path(), LoadMode::Production).unwrap();
        assert_eq!(loaded.article_count(), 3);
        assert!(loaded.langs["de"].contains_key("rosenkranz"));
        assert_eq!(loaded.langs["en"].len(), 2);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn missing_index_warns_in_development() {
        let tmp = TempDir::new().unwrap();
        write_article(tmp.path(), "en", "done", MINIMAL);
        fs::create_dir_all(tmp.path().join("en").join("draft")).unwrap();

        let loaded = load_articles(tmp.path(), LoadMode::Development).unwrap();
        assert_eq!(loaded.article_count(), 1);
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::MissingArticle {
                lang: "en".into(),
                slug: "draft".into(),
            }]
        );
    }

    #[test]
    fn missing_index_is_fatal_in_production() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("en").join("draft")).unwrap();

        let err = load_articles(tmp.path(), LoadMode::Production).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingArticle { ref slug, .. } if slug == "draft"
        ));
    }

    #[test]
    fn malformed_json_is_fatal_in_both_modes() {
        let tmp = TempDir::new().unwrap();
        write_article(tmp.path(), "en", "broken", "{ not json");

        for mode in [LoadMode::Development, LoadMode::Production] {
            let err = load_articles(tmp.path(), mode).unwrap_err();
            assert!(matches!(err, LoadError::Parse { .. }));
        }
    }

    #[test]
    fn empty_tree_loads_nothing() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_articles(tmp.path(), LoadMode::Production).unwrap();
        assert_eq!(loaded.article_count(), 0);
    }
}
