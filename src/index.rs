//! Cross-article taxonomy and date indexing.
//!
//! [`SiteIndex`] is the single accumulator for the build pass: call
//! [`SiteIndex::record`] once per article while pages are assembled, then
//! [`SiteIndex::drain`] exactly once afterwards. `drain` takes `self` by
//! value, so the type system rules out reading the indices mid-pass or
//! recording into them afterwards. If article rendering is ever
//! parallelized, recording stays a sequential fold over the rendered
//! results.
//!
//! Tag buckets keep articles in recording order. The date index keeps one
//! article per calendar day: a later-recorded article silently overwrites an
//! earlier one on the same date. The archive dates articles to distinct days
//! in practice, so the overwrite is accepted rather than guarded against.

use crate::types::{Catalog, Document};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("article '{slug}' carries tag '{tag}' which is not in the tag catalog")]
    UnknownTag { tag: String, slug: String },
}

/// Non-fatal findings surfaced to the caller for CLI output.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexWarning {
    /// Undated article that is not a prayer. Tolerated so authors can
    /// publish incrementally; the newest listing simply skips it.
    MissingDate { lang: String, slug: String },
}

impl std::fmt::Display for IndexWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexWarning::MissingDate { lang, slug } => {
                write!(f, "article {lang}/{slug} has no date and is not a prayer")
            }
        }
    }
}

/// `(slug, title)` pair pointing at a rendered article page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRef {
    pub slug: String,
    pub title: String,
}

/// Accumulator for both derived indices. Rebuilt from scratch every run.
#[derive(Debug, Default)]
pub struct SiteIndex {
    // lang → tag id → articles in recording order
    tags: BTreeMap<String, BTreeMap<String, Vec<ArticleRef>>>,
    // lang → year → month → day → last-recorded article
    dates: BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, ArticleRef>>>>,
}

/// Finalized tag index: lang → tag id → ordered article refs.
#[derive(Debug, Default)]
pub struct TagIndex {
    pub langs: BTreeMap<String, BTreeMap<String, Vec<ArticleRef>>>,
}

impl TagIndex {
    pub fn bucket(&self, lang: &str, tag: &str) -> Option<&[ArticleRef]> {
        self.langs.get(lang)?.get(tag).map(Vec::as_slice)
    }
}

/// One year of dated articles, months and days in calendar order.
#[derive(Debug)]
pub struct YearEntry {
    pub year: String,
    pub months: BTreeMap<String, BTreeMap<String, ArticleRef>>,
}

/// Finalized date index: years listed most recent first.
#[derive(Debug, Default)]
pub struct DateIndex {
    pub langs: BTreeMap<String, Vec<YearEntry>>,
}

impl SiteIndex {
    pub fn new() -> SiteIndex {
        SiteIndex::default()
    }

    /// Record one article into both indices.
    ///
    /// Every tag must exist in the catalog — an unknown tag aborts the run
    /// rather than publishing a dangling topic link. A missing date is a
    /// warning unless the article is a prayer.
    pub fn record(
        &mut self,
        doc: &Document,
        slug: &str,
        lang: &str,
        catalog: &Catalog,
    ) -> Result<Option<IndexWarning>, IndexError> {
        let article = ArticleRef {
            slug: slug.to_string(),
            title: doc.title.clone(),
        };

        for tag in &doc.tags {
            if catalog.tag_name(tag).is_none() {
                return Err(IndexError::UnknownTag {
                    tag: tag.clone(),
                    slug: slug.to_string(),
                });
            }
            self.tags
                .entry(lang.to_string())
                .or_default()
                .entry(tag.clone())
                .or_default()
                .push(article.clone());
        }

        match doc.date_parts() {
            Some((year, month, day)) => {
                self.dates
                    .entry(lang.to_string())
                    .or_default()
                    .entry(year.to_string())
                    .or_default()
                    .entry(month.to_string())
                    .or_default()
                    .insert(day.to_string(), article);
                Ok(None)
            }
            None if doc.is_prayer() => Ok(None),
            None => Ok(Some(IndexWarning::MissingDate {
                lang: lang.to_string(),
                slug: slug.to_string(),
            })),
        }
    }

    /// Finalize both indices, consuming the accumulator.
    ///
    /// Year order is reversed so listings show the most recent year first;
    /// months and days stay in calendar order within a year.
    pub fn drain(self) -> (TagIndex, DateIndex) {
        let tags = TagIndex { langs: self.tags };
        let dates = DateIndex {
            langs: self
                .dates
                .into_iter()
                .map(|(lang, years)| {
                    let entries = years
                        .into_iter()
                        .rev()
                        .map(|(year, months)| YearEntry { year, months })
                        .collect();
                    (lang, entries)
                })
                .collect(),
        };
        (tags, dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_catalog, tagged_doc};

    fn dated_doc(title: &str, tags: &[&str], date: &str) -> Document {
        let mut doc = tagged_doc(title, tags);
        doc.date = Some(date.to_string());
        doc
    }

    #[test]
    fn tag_bucket_preserves_recording_order() {
        let catalog = sample_catalog();
        let mut index = SiteIndex::new();
        index
            .record(&dated_doc("First", &["liturgie"], "2024-01-01"), "a", "en", &catalog)
            .unwrap();
        index
            .record(&dated_doc("Second", &["liturgie"], "2024-02-01"), "b", "en", &catalog)
            .unwrap();

        let (tags, _) = index.drain();
        let bucket = tags.bucket("en", "liturgie").unwrap();
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket[0].slug, "a");
        assert_eq!(bucket[0].title, "First");
        assert_eq!(bucket[1].slug, "b");
    }

    #[test]
    fn buckets_are_per_language() {
        let catalog = sample_catalog();
        let mut index = SiteIndex::new();
        index
            .record(&dated_doc("De", &["liturgie"], "2024-01-01"), "x", "de", &catalog)
            .unwrap();
        index
            .record(&dated_doc("En", &["liturgie"], "2024-01-01"), "x", "en", &catalog)
            .unwrap();
        let (tags, _) = index.drain();
        assert_eq!(tags.bucket("de", "liturgie").unwrap().len(), 1);
        assert_eq!(tags.bucket("en", "liturgie").unwrap().len(), 1);
    }

    #[test]
    fn unknown_tag_is_fatal() {
        let catalog = sample_catalog();
        let mut index = SiteIndex::new();
        let err = index
            .record(&tagged_doc("T", &["nonexistent"]), "s", "en", &catalog)
            .unwrap_err();
        match err {
            IndexError::UnknownTag { tag, slug } => {
                assert_eq!(tag, "nonexistent");
                assert_eq!(slug, "s");
            }
        }
    }

    #[test]
    fn same_day_collision_keeps_later_article() {
        let catalog = sample_catalog();
        let mut index = SiteIndex::new();
        index
            .record(&dated_doc("Early", &[], "2024-01-01"), "early", "en", &catalog)
            .unwrap();
        index
            .record(&dated_doc("Late", &[], "2024-01-01"), "late", "en", &catalog)
            .unwrap();

        let (_, dates) = index.drain();
        let years = &dates.langs["en"];
        assert_eq!(years.len(), 1);
        let day = &years[0].months["01"]["01"];
        assert_eq!(day.slug, "late");
    }

    #[test]
    fn years_drain_most_recent_first() {
        let catalog = sample_catalog();
        let mut index = SiteIndex::new();
        index
            .record(&dated_doc("Old", &[], "2019-05-01"), "old", "en", &catalog)
            .unwrap();
        index
            .record(&dated_doc("New", &[], "2024-03-02"), "new", "en", &catalog)
            .unwrap();

        let (_, dates) = index.drain();
        let years: Vec<&str> = dates.langs["en"].iter().map(|y| y.year.as_str()).collect();
        assert_eq!(years, vec!["2024", "2019"]);
    }

    #[test]
    fn undated_prayer_passes_without_warning() {
        let catalog = sample_catalog();
        let mut index = SiteIndex::new();
        let warn = index
            .record(&tagged_doc("Ave", &["gebet"]), "ave", "de", &catalog)
            .unwrap();
        assert_eq!(warn, None);
    }

    #[test]
    fn undated_non_prayer_warns() {
        let catalog = sample_catalog();
        let mut index = SiteIndex::new();
        let warn = index
            .record(&tagged_doc("Tract", &["liturgie"]), "tract", "en", &catalog)
            .unwrap();
        assert!(matches!(warn, Some(IndexWarning::MissingDate { .. })));
    }
}
