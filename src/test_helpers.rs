//! Shared test fixtures for the breviary test suite.
//!
//! Builders for the input data every stage consumes: sample documents, a
//! small tag catalog, an author directory, and a full synthetic devotional
//! table. Fixtures are deliberately tiny but structurally complete, so a
//! test can run the whole pipeline against them.

use crate::assemble::TemplateSet;
use crate::locale::Localized;
use crate::rosary::{Decade, DevotionalTable, Reflection, RosaryTemplates};
use crate::special::{ContentSection, SectionBody, SpecialPage};
use crate::types::{
    Author, AuthorDirectory, Catalog, Document, DonationPlatform, InlineItem, Paragraph, Section,
    StyleFlag, TextSpan,
};
use std::collections::BTreeMap;

/// A paragraph of one plain text span.
pub fn text_par(text: &str) -> Paragraph {
    Paragraph(vec![InlineItem::Text(TextSpan {
        text: text.to_string(),
        context: vec![],
        link: None,
        title: None,
    })])
}

/// A paragraph holding one internal link span.
pub fn link_par(text: &str, href: &str) -> Paragraph {
    Paragraph(vec![InlineItem::Text(TextSpan {
        text: text.to_string(),
        context: vec![StyleFlag::Link],
        link: Some(href.to_string()),
        title: Some(text.to_string()),
    })])
}

/// Minimal document with the given title and tags, no date.
pub fn tagged_doc(title: &str, tags: &[&str]) -> Document {
    Document {
        title: title.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

/// A structurally complete article: dated, tagged, authored, with an
/// abstract and two body sections.
pub fn sample_doc() -> Document {
    Document {
        title: "Sample Article".to_string(),
        tags: vec!["liturgie".to_string()],
        date: Some("2024-01-05".to_string()),
        authors: vec!["mmo".to_string()],
        summary: vec![text_par("An abstract paragraph.")],
        sections: vec![
            Section {
                header: "First Part".to_string(),
                level: 2,
                pars: vec![
                    text_par("Opening paragraph of the body."),
                    link_par("a cross reference", "en/creed"),
                ],
            },
            Section {
                header: "Second Part".to_string(),
                level: 3,
                pars: vec![text_par("Nested material.")],
            },
        ],
        img: None,
    }
}

fn localized(de: &str, en: &str) -> Localized {
    Localized {
        de: de.to_string(),
        en: en.to_string(),
    }
}

/// Catalog with the tags the fixtures use, one featured grouping, and one
/// curated page.
pub fn sample_catalog() -> Catalog {
    let mut tags = BTreeMap::new();
    tags.insert("liturgie".to_string(), localized("Liturgie", "Liturgy"));
    tags.insert("gebet".to_string(), localized("Gebet", "Prayer"));
    tags.insert("prayer".to_string(), localized("Gebet", "Prayer"));

    let mut featured = BTreeMap::new();
    featured.insert(
        "ibelievein".to_string(),
        vec!["sample".to_string(), "missing-article".to_string()],
    );

    let about = SpecialPage {
        title: "About".to_string(),
        description: "Imprint and contact".to_string(),
        sections: vec![ContentSection {
            id: "legal".to_string(),
            title: "Legal".to_string(),
            body: SectionBody::TextList(vec!["A line of legal text.".to_string()]),
        }],
    };
    let mut about_langs = BTreeMap::new();
    about_langs.insert("en".to_string(), about.clone());
    about_langs.insert("de".to_string(), about);
    let mut pages = BTreeMap::new();
    pages.insert("about".to_string(), about_langs);

    Catalog {
        tags,
        featured,
        pages,
    }
}

/// One-author directory matching `sample_doc`'s author list.
pub fn sample_authors() -> AuthorDirectory {
    let mut authors = AuthorDirectory::new();
    authors.insert(
        "mmo".to_string(),
        Author {
            name: "M. Mustermann".to_string(),
            contact: "https://example.org/contact".to_string(),
            donate: [(
                DonationPlatform::KoFi,
                "https://ko-fi.com/mustermann".to_string(),
            )]
            .into_iter()
            .collect(),
        },
    );
    authors
}

/// Full 15-decade devotional table with predictable reflection texts
/// (`"reflection en {decade}/{slot}"`).
pub fn synthetic_devotional_table() -> DevotionalTable {
    let mut decades = BTreeMap::new();
    for d in 1..=15u8 {
        let mut prayers = BTreeMap::new();
        for q in 1..=10u8 {
            prayers.insert(
                q,
                Reflection {
                    de: format!("reflection de {d}/{q}"),
                    en: format!("reflection en {d}/{q}"),
                    source: "Lc 1".to_string(),
                },
            );
        }
        decades.insert(
            d,
            Decade {
                name: localized(&format!("Geheimnis {d}"), &format!("Mystery {d}")),
                prayers,
            },
        );
    }
    DevotionalTable { decades }
}

/// The compiled-in rosary snippet templates.
pub fn builtin_rosary_templates() -> RosaryTemplates {
    TemplateSet::builtin().rosary
}
