//! Aggregate and static page rendering.
//!
//! Uses [maud](https://maud.lambda.xyz/) for the generated fragments. Two
//! kinds of pages come out of here:
//!
//! - **Static special pages** (resources, shop, about) whose content is
//!   curated in the tag catalog as a list of [`ContentSection`]s.
//! - **Listing pages** derived from the drained indices: the per-tag pages,
//!   the topics overview, the newest-articles page, the author directory
//!   page, and the homepage's featured groupings.
//!
//! A content section is a tagged union of three shapes. The source data
//! marks the shape by which key is present (`links`, `texts`, or `link`);
//! [`RawSection`] resolves that at ingestion time, in that precedence order,
//! so the rest of the crate only ever sees an unambiguous [`SectionBody`].
//! A section carrying none of the three keys is rejected at load time.

use crate::locale::{Label, Lang, label};
use crate::types::{Author, AuthorDirectory};
use maud::{Markup, PreEscaped, html};
use serde::Deserialize;

/// `(slug, title)` pair inside a curated or derived link list. The slug may
/// also be an absolute URL for off-site entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionLink {
    pub slug: String,
    pub title: String,
}

/// One content section of a static special page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct ContentSection {
    pub id: String,
    pub title: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    /// A list of article or external links.
    LinkList(Vec<SectionLink>),
    /// Free paragraphs; raw HTML lines pass through untouched.
    TextList(Vec<String>),
    /// One large image-backed link (shop tiles).
    ImageLink { link: SectionLink, img: String },
}

#[derive(Deserialize)]
struct RawSection {
    id: String,
    title: String,
    #[serde(default)]
    links: Option<Vec<SectionLink>>,
    #[serde(default)]
    texts: Option<Vec<String>>,
    #[serde(default)]
    link: Option<SectionLink>,
    #[serde(default)]
    img: Option<String>,
}

impl TryFrom<RawSection> for ContentSection {
    type Error = String;

    // Precedence when several keys are present: links, then texts, then link.
    fn try_from(raw: RawSection) -> Result<ContentSection, String> {
        let body = if let Some(links) = raw.links {
            SectionBody::LinkList(links)
        } else if let Some(texts) = raw.texts {
            SectionBody::TextList(texts)
        } else if let Some(link) = raw.link {
            SectionBody::ImageLink {
                link,
                img: raw.img.unwrap_or_default(),
            }
        } else {
            return Err(format!(
                "section '{}' has none of 'links', 'texts' or 'link'",
                raw.id
            ));
        };
        Ok(ContentSection {
            id: raw.id,
            title: raw.title,
            body,
        })
    }
}

/// A curated static page as stored in the tag catalog.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct SpecialPage {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sections: Vec<ContentSection>,
}

fn link_href(lang: Lang, slug: &str) -> String {
    if slug.starts_with("http") {
        slug.to_string()
    } else {
        format!("$$ROOT_HREF$$/{}/{slug}", lang.code())
    }
}

fn link_items(lang: Lang, links: &[SectionLink]) -> Markup {
    html! {
        @for (i, l) in links.iter().enumerate() {
            li.block.link-modified-recently-list-item.dark-mode-invert
                style={ "--bsm:" (if i == 0 { "4" } else { "0" }) ";" } {
                p.in-list.first-graf.block style="--bsm: 0;" {
                    a.link-annotated.link-page.link-modified-recently.in-list.has-annotation.spawns-popup
                        href=(link_href(lang, &l.slug))
                        data-attribute-title=(l.title) {
                        (l.title)
                    }
                }
            }
        }
    }
}

fn text_items(texts: &[String]) -> Markup {
    html! {
        @for t in texts {
            @if t.trim().is_empty() {
                br;
            } @else if t.trim().starts_with('<') {
                (PreEscaped(t.clone()))
            } @else {
                p style="text-indent: 0px;" { (PreEscaped(t.clone())) }
            }
        }
    }
}

fn image_link_item(lang: Lang, link: &SectionLink, img: &str) -> Markup {
    html! {
        a.shop-tile href=(link_href(lang, &link.slug))
            style={ "background-image: url(" (img) ");" } {
            p.shop-tile-title { (link.title) }
        }
    }
}

/// Shared wrapper for every section variant: anchor-linked heading plus the
/// variant-specific items.
pub fn render_section(lang: Lang, section: &ContentSection) -> Markup {
    let items = match &section.body {
        SectionBody::LinkList(links) => link_items(lang, links),
        SectionBody::TextList(texts) => text_items(texts),
        SectionBody::ImageLink { link, img } => image_link_item(lang, link, img),
    };
    html! {
        section.index-section id=(section.id) {
            h1 {
                a.section-link href={ "#" (section.id) }
                    data-attribute-title=(section.title) {
                    (section.title)
                }
            }
            ul.list.list-level-1 { (items) }
        }
    }
}

/// Body HTML of a curated static page.
pub fn render_special(lang: Lang, page: &SpecialPage) -> String {
    let markup = html! {
        @for section in &page.sections {
            (render_section(lang, section))
        }
    };
    markup.into_string()
}

/// One derived link-list section, used by every index-like listing.
pub fn listing_section(lang: Lang, id: &str, title: &str, links: &[SectionLink]) -> Markup {
    render_section(
        lang,
        &ContentSection {
            id: id.to_string(),
            title: title.to_string(),
            body: SectionBody::LinkList(links.to_vec()),
        },
    )
}

/// Body of the per-language author directory page.
pub fn render_authors(lang: Lang, authors: &AuthorDirectory) -> String {
    let markup = html! {
        @for (id, author) in authors {
            (author_section(lang, id, author))
        }
    };
    markup.into_string()
}

fn author_section(lang: Lang, id: &str, author: &Author) -> Markup {
    html! {
        section.index-section.author-section id=(id) {
            h1 {
                a.section-link href={ "#" (id) }
                    data-attribute-title=(author.name) {
                    (author.name)
                }
            }
            @if !author.contact.is_empty() {
                p.author-contact style="text-indent: 0px;" {
                    a href=(author.contact) { (label(lang, Label::ContactLink)) }
                }
            }
            @if !author.donate.is_empty() {
                ul.list.list-level-1 {
                    @for (platform, url) in &author.donate {
                        li.block {
                            a.link-annotated href=(url) { (platform.display()) }
                        }
                    }
                }
            }
        }
    }
}
