//! Shared data model for loaded content.
//!
//! Everything in this module is an immutable *input*: article documents,
//! the author directory, and the tag catalog are deserialized once per run
//! and never mutated. Derived structures (tag and date indices) live in
//! [`crate::index`].
//!
//! ## Document shape
//!
//! An article document is pre-parsed JSON produced by the authoring
//! toolchain — this crate never sees markdown. Rich text arrives as
//! paragraphs of inline items, each item adjacently tagged:
//!
//! ```json
//! { "type": "text", "data": { "text": "…", "context": ["bold", "link"],
//!   "link": "en/some-article", "title": "tooltip" } }
//! ```
//!
//! Unknown item types deserialize to [`InlineItem::Unknown`] and render as
//! the empty string, so newer authoring tools can emit new item kinds
//! without breaking older generator binaries.

use crate::locale::Localized;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One article, keyed externally by `(language, slug)`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// ISO-8601 `YYYY-MM-DD`. Optional; see `IndexWarning::MissingDate`.
    #[serde(default)]
    pub date: Option<String>,
    /// Author ids resolved against the author directory.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Abstract paragraphs shown in the blockquote shell above the body.
    #[serde(default)]
    pub summary: Vec<Paragraph>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub img: Option<ImageMeta>,
}

impl Document {
    /// Split the ISO date into `(year, month, day)` string parts.
    pub fn date_parts(&self) -> Option<(&str, &str, &str)> {
        let mut iter = self.date.as_deref()?.split('-');
        let year = iter.next()?;
        let month = iter.next()?;
        let day = iter.next()?;
        Some((year, month, day))
    }

    /// Prayer articles are exempt from the dating requirement.
    pub fn is_prayer(&self) -> bool {
        self.tags.iter().any(|t| t == "gebet" || t == "prayer")
    }

    /// Plain text of the first summary paragraph, used as the page
    /// description in `<head>` metadata.
    pub fn description(&self) -> String {
        self.summary
            .first()
            .map(|p| p.plain_text())
            .unwrap_or_default()
    }
}

/// A body section: heading plus paragraphs. `level` drives both the heading
/// tag and the table-of-contents nesting.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Section {
    pub header: String,
    pub level: usize,
    #[serde(default)]
    pub pars: Vec<Paragraph>,
}

/// Ordered inline items; serialized as a bare JSON array.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paragraph(pub Vec<InlineItem>);

impl Paragraph {
    pub fn plain_text(&self) -> String {
        self.0
            .iter()
            .filter_map(|item| match item {
                InlineItem::Text(span) => Some(span.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Adjacently tagged inline content.
///
/// Deserialization is manual: an unrecognized `type` must swallow whatever
/// `data` payload it carries, which a derived adjacently-tagged enum cannot
/// express (it would reject the payload after matching the tag).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InlineItem {
    Text(TextSpan),
    Code(CodeBlock),
    /// Forward-compatible no-op for item kinds this binary predates.
    Unknown,
}

#[derive(Deserialize)]
struct RawInlineItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl<'de> Deserialize<'de> for InlineItem {
    fn deserialize<D>(deserializer: D) -> Result<InlineItem, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawInlineItem::deserialize(deserializer)?;
        let item = match raw.kind.as_str() {
            "text" => InlineItem::Text(
                serde_json::from_value(raw.data).map_err(serde::de::Error::custom)?,
            ),
            "code" => InlineItem::Code(
                serde_json::from_value(raw.data).map_err(serde::de::Error::custom)?,
            ),
            _ => InlineItem::Unknown,
        };
        Ok(item)
    }
}

/// A run of styled text.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub context: Vec<StyleFlag>,
    /// Target URL, meaningful only when `context` contains `link`.
    #[serde(default)]
    pub link: Option<String>,
    /// Tooltip title for the link.
    #[serde(default)]
    pub title: Option<String>,
}

impl TextSpan {
    pub fn has(&self, flag: StyleFlag) -> bool {
        self.context.contains(&flag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    Link,
}

/// Declared but deliberately unrendered; see `richtext::render_paragraph`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// Social-card image metadata. Width and height stay strings because they
/// are substituted verbatim into meta tags.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ImageMeta {
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
}

/// Donation platforms are a closed set. An unknown key in an author file is
/// a deserialization error, which aborts the run before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DonationPlatform {
    Paypal,
    KoFi,
    Github,
}

impl DonationPlatform {
    pub fn display(&self) -> &'static str {
        match self {
            DonationPlatform::Paypal => "PayPal",
            DonationPlatform::KoFi => "Ko-fi",
            DonationPlatform::Github => "GitHub",
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub donate: BTreeMap<DonationPlatform, String>,
}

/// Author directory keyed by author id.
pub type AuthorDirectory = BTreeMap<String, Author>;

/// Externally curated tag catalog. Read-only to the generator; article tags
/// that are missing here fail the run.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Catalog {
    /// Tag id → per-language display name.
    pub tags: BTreeMap<String, Localized>,
    /// Homepage groupings (`ibelievein`, `iwanttolearn`) → article slugs.
    #[serde(default)]
    pub featured: BTreeMap<String, Vec<String>>,
    /// Static special pages (`ressources`, `shop`, `about`),
    /// page id → language code → content.
    #[serde(default)]
    pub pages: BTreeMap<String, BTreeMap<String, crate::special::SpecialPage>>,
}

impl Catalog {
    pub fn tag_name(&self, tag: &str) -> Option<&Localized> {
        self.tags.get(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_item_unknown_kind_deserializes() {
        // Unknown kinds must swallow their payload, not reject it.
        let json = r#"{ "type": "marginnote", "data": { "whatever": 1 } }"#;
        let item: InlineItem = serde_json::from_str(json).unwrap();
        assert!(matches!(item, InlineItem::Unknown));
    }

    #[test]
    fn inline_item_unknown_kind_without_payload_deserializes() {
        let item: InlineItem = serde_json::from_str(r#"{ "type": "sidenote" }"#).unwrap();
        assert!(matches!(item, InlineItem::Unknown));
    }

    #[test]
    fn paragraph_with_unknown_items_still_parses() {
        let json = r#"[
            { "type": "text", "data": { "text": "kept" } },
            { "type": "footnote", "data": { "ref": 3, "pars": [] } }
        ]"#;
        let par: Paragraph = serde_json::from_str(json).unwrap();
        assert_eq!(par.plain_text(), "kept");
    }

    #[test]
    fn text_span_roundtrips_context_flags() {
        let json = r#"{ "type": "text", "data": {
            "text": "hi", "context": ["bold", "link"],
            "link": "en/foo", "title": "t" } }"#;
        let item: InlineItem = serde_json::from_str(json).unwrap();
        match item {
            InlineItem::Text(span) => {
                assert!(span.has(StyleFlag::Bold));
                assert!(span.has(StyleFlag::Link));
                assert!(!span.has(StyleFlag::Italic));
                assert_eq!(span.link.as_deref(), Some("en/foo"));
            }
            other => panic!("expected text span, got {other:?}"),
        }
    }

    #[test]
    fn unknown_donation_platform_is_an_error() {
        let json = r#"{ "name": "A", "contact": "", "donate": { "patreon": "x" } }"#;
        assert!(serde_json::from_str::<Author>(json).is_err());
    }

    #[test]
    fn known_donation_platforms_parse() {
        let json = r#"{ "name": "A", "donate": {
            "paypal": "p", "ko-fi": "k", "github": "g" } }"#;
        let author: Author = serde_json::from_str(json).unwrap();
        assert_eq!(author.donate.len(), 3);
        assert_eq!(author.donate[&DonationPlatform::KoFi], "k");
    }

    #[test]
    fn date_parts_splits_iso_dates() {
        let doc = Document {
            date: Some("2024-01-31".into()),
            ..Default::default()
        };
        assert_eq!(doc.date_parts(), Some(("2024", "01", "31")));
        let undated = Document::default();
        assert_eq!(undated.date_parts(), None);
    }

    #[test]
    fn prayer_detection_covers_both_spellings() {
        let de = Document {
            tags: vec!["gebet".into()],
            ..Default::default()
        };
        let en = Document {
            tags: vec!["prayer".into()],
            ..Default::default()
        };
        assert!(de.is_prayer());
        assert!(en.is_prayer());
        assert!(!Document::default().is_prayer());
    }
}
