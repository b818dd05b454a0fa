//! Page assembly: templates plus fragments in, complete HTML documents out.
//!
//! The shell templates live under `templates/` and are compiled into the
//! binary with `include_str!`. Placeholders come in two kinds:
//!
//! - `$$TOKEN$$` values and `<!-- MARKER -->` blocks that appear **exactly
//!   once** per template. [`TemplateSet::verify`] checks that contract at
//!   startup so a template edit cannot silently drop a fragment.
//! - `$$ROOT_HREF$$`, which repeats and is resolved last, over the whole
//!   document, when the caller knows whether it is a production build.
//!
//! Assembly is plain textual substitution and order-independent, with two
//! couplings: the table of contents is computed from the same section
//! sequence as the body, and the author links in the metadata block come
//! from the same author list stored on the document.
//!
//! The rosary devotional pages bypass the table of contents and the
//! metadata block entirely; their body is built by [`crate::rosary`] and
//! dropped into the same shell via [`assemble_devotional`].

use crate::locale::{Label, Lang, label};
use crate::richtext::{self, Dropcap, RenderError};
use crate::rosary::RosaryTemplates;
use crate::types::{AuthorDirectory, Catalog, Document, Section};
use maud::html;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("template '{template}' must contain '{token}' exactly once, found {count}")]
    Template {
        template: &'static str,
        token: String,
        count: usize,
    },
    #[error("article '{slug}': {source}")]
    Content {
        slug: String,
        #[source]
        source: RenderError,
    },
    #[error("article '{slug}' references unknown author '{author}'")]
    UnknownAuthor { slug: String, author: String },
    #[error("article '{slug}' carries tag '{tag}' which is not in the tag catalog")]
    UnknownTag { slug: String, tag: String },
}

/// All shell templates, loaded once. The critical CSS is inlined into the
/// head template at construction so every page ships it without a request.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub page: String,
    pub head: String,
    pub header_navigation: String,
    pub page_metadata: String,
    pub body_noscript: String,
    pub rosary: RosaryTemplates,
}

const PAGE_TOKENS: &[&str] = &[
    "$$LANG$$",
    "$$SLUG$$",
    "$$SKIP_TO_MAIN_CONTENT$$",
    "$$TITLE$$",
    "<!-- HEAD_TEMPLATE_HTML -->",
    "<!-- HEADER_NAVIGATION -->",
    "<!-- LINK_TAGS -->",
    "<!-- PAGE_DESCRIPTION -->",
    "<!-- PAGE_METADATA -->",
    "<!-- TABLE_OF_CONTENTS -->",
    "<!-- BODY_ABSTRACT -->",
    "<!-- BODY_CONTENT -->",
    "<!-- BODY_NOSCRIPT -->",
];

const HEAD_TOKENS: &[&str] = &[
    "$$TITLE$$",
    "$$DESCRIPTION$$",
    "$$KEYWORDS$$",
    "$$AUTHOR$$",
    "$$DATE$$",
    "$$PAGE_HREF$$",
    "$$IMG$$",
    "$$IMG_ALT$$",
    "$$IMG_WIDTH$$",
    "$$IMG_HEIGHT$$",
];

const METADATA_TOKENS: &[&str] = &[
    "$$DATE_TITLE$$",
    "$$DATE_DESC$$",
    "$$BACKLINKS_TITLE$$",
    "$$BACKLINKS_DESC$$",
    "$$SIMILAR_TITLE$$",
    "$$SIMILAR_DESC$$",
    "$$BIBLIOGRAPHY_TITLE$$",
    "$$BIBLIOGRAPHY_DESC$$",
    "$$AUTHOR_LINKS$$",
];

const NAV_TOKENS: &[&str] = &[
    "$$HOMEPAGE_LOGO$$",
    "$$HOMEPAGE_DESC$$",
    "$$HOMEPAGE_LINK$$",
    "$$ALL_ARTICLES_TITLE$$",
    "$$ALL_ARTICLES_DESC$$",
    "$$ALL_ARTICLES_LINK$$",
    "$$NEWEST_TITLE$$",
    "$$NEWEST_DESC$$",
    "$$NEWEST_LINK$$",
    "$$TOOLS_TITLE$$",
    "$$TOOLS_DESC$$",
    "$$TOOLS_LINK$$",
    "$$SHOP_TITLE$$",
    "$$SHOP_DESC$$",
    "$$SHOP_LINK$$",
    "$$ABOUT_TITLE$$",
    "$$ABOUT_DESC$$",
    "$$ABOUT_LINK$$",
];

impl TemplateSet {
    pub fn builtin() -> TemplateSet {
        let critical_css = format!(
            "    <style>{}</style>",
            include_str!("../static/critical.css")
        );
        TemplateSet {
            page: include_str!("../templates/page.html").to_string(),
            head: include_str!("../templates/head.html")
                .replace("<!-- CRITICAL_CSS -->", &critical_css),
            header_navigation: include_str!("../templates/header-navigation.html").to_string(),
            page_metadata: include_str!("../templates/page-metadata.html").to_string(),
            body_noscript: include_str!("../templates/body-noscript.html").to_string(),
            rosary: RosaryTemplates {
                main: include_str!("../templates/rosary/main.html").to_string(),
                outro: include_str!("../templates/rosary/outro.html").to_string(),
                ourfather: include_str!("../templates/rosary/ourfather.html").to_string(),
                glorybe: include_str!("../templates/rosary/glorybe.html").to_string(),
                fatima: include_str!("../templates/rosary/fatima.html").to_string(),
                nav: include_str!("../templates/rosary/nav.html").to_string(),
                prayer: include_str!("../templates/rosary/prayer.html").to_string(),
            },
        }
    }

    /// Check the exactly-once placeholder contract on every shell template.
    pub fn verify(&self) -> Result<(), AssembleError> {
        let checks: [(&'static str, &str, &[&str]); 4] = [
            ("page", &self.page, PAGE_TOKENS),
            ("head", &self.head, HEAD_TOKENS),
            ("page-metadata", &self.page_metadata, METADATA_TOKENS),
            ("header-navigation", &self.header_navigation, NAV_TOKENS),
        ];
        for (name, text, tokens) in checks {
            for token in tokens {
                let count = text.matches(token).count();
                if count != 1 {
                    return Err(AssembleError::Template {
                        template: name,
                        token: token.to_string(),
                        count,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Per-page routing context computed by the caller.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub lang: Lang,
    pub slug: String,
}

impl RouteMeta {
    pub fn new(lang: Lang, slug: &str) -> RouteMeta {
        RouteMeta {
            lang,
            slug: slug.to_string(),
        }
    }

    fn page_href(&self) -> String {
        format!("$$ROOT_HREF$$/{}/{}", self.lang.code(), self.slug)
    }
}

/// Anchor id for a section header: lower-cased, spaces to hyphens. Two
/// sections with the same header text share an anchor; that collision is
/// accepted, not deduplicated.
pub fn section_anchor(header: &str) -> String {
    header.to_lowercase().replace(' ', "-")
}

/// Nested table-of-contents list built from the section level sequence.
///
/// Stack walk: a level increase opens exactly one nested list regardless of
/// how far the level jumps; a level decrease closes one list per level step,
/// but never below the first section's level (a section levelled beneath the
/// start is treated as sitting at the start level). After the walk every
/// list still open is closed down to the first section's level.
pub fn render_toc(sections: &[Section]) -> String {
    let Some(first) = sections.first() else {
        return String::new();
    };
    let start_level = first.level;
    let mut current_level = start_level;
    let mut out = String::from("<div class=\"TOC\"><ul class=\"list-level-1\">");

    for section in sections {
        if section.level > current_level {
            out.push_str("<ul>");
        }
        while section.level < current_level && current_level > start_level {
            out.push_str("</ul>");
            current_level -= 1;
        }
        current_level = section.level.max(start_level);
        let anchor = section_anchor(&section.header);
        out.push_str(&format!(
            "<li><a href=\"#{anchor}\">{}</a></li>",
            section.header
        ));
    }

    while current_level > start_level {
        out.push_str("</ul>");
        current_level -= 1;
    }
    out.push_str("</ul></div>");
    out
}

fn content_err(slug: &str) -> impl FnOnce(RenderError) -> AssembleError + '_ {
    move |source| AssembleError::Content {
        slug: slug.to_string(),
        source,
    }
}

/// Tag chips under the page title, linking into the topics overview.
fn render_tag_links(
    doc: &Document,
    route: &RouteMeta,
    catalog: &Catalog,
) -> Result<String, AssembleError> {
    let lang = route.lang;
    let mut chips = Vec::with_capacity(doc.tags.len());
    for tag in &doc.tags {
        let name = catalog
            .tag_name(tag)
            .ok_or_else(|| AssembleError::UnknownTag {
                slug: route.slug.clone(),
                tag: tag.clone(),
            })?;
        chips.push((tag.as_str(), name.get(lang)));
    }
    let topics = label(lang, Label::AllArticlesLink);
    let markup = html! {
        @if !chips.is_empty() {
            div.link-tags {
                @for (tag, name) in &chips {
                    a.link-tag
                        href={ "$$ROOT_HREF$$/" (lang.code()) "/" (topics) "#" (tag) }
                        title=(label(lang, Label::TagLinkDesc)) {
                        (name)
                    }
                }
            }
        }
    };
    Ok(markup.into_string())
}

/// Author name links for the metadata block, resolved against the author
/// directory. An unknown author id aborts the run.
fn render_author_links(
    doc: &Document,
    route: &RouteMeta,
    authors: &AuthorDirectory,
) -> Result<String, AssembleError> {
    let mut resolved = Vec::with_capacity(doc.authors.len());
    for id in &doc.authors {
        let author = authors.get(id).ok_or_else(|| AssembleError::UnknownAuthor {
            slug: route.slug.clone(),
            author: id.clone(),
        })?;
        resolved.push(author);
    }
    let markup = html! {
        @for author in &resolved {
            span.page-author {
                @if author.contact.is_empty() {
                    (author.name)
                } @else {
                    a href=(author.contact) { (author.name) }
                }
            }
        }
    };
    Ok(markup.into_string())
}

fn resolved_author_names(
    doc: &Document,
    route: &RouteMeta,
    authors: &AuthorDirectory,
) -> Result<String, AssembleError> {
    let mut names = Vec::with_capacity(doc.authors.len());
    for id in &doc.authors {
        let author = authors.get(id).ok_or_else(|| AssembleError::UnknownAuthor {
            slug: route.slug.clone(),
            author: id.clone(),
        })?;
        names.push(author.name.as_str());
    }
    Ok(names.join(", "))
}

/// The summary paragraphs rendered as the abstract blockquote.
fn render_abstract(doc: &Document, route: &RouteMeta) -> Result<String, AssembleError> {
    if doc.summary.is_empty() {
        return Ok(String::new());
    }
    let mut out = String::from("<blockquote class=\"page-abstract\">");
    for (i, par) in doc.summary.iter().enumerate() {
        let class = if i == 0 {
            "first-block first-graf block"
        } else {
            "block"
        };
        let html = richtext::render_paragraph(par, Dropcap::Off)
            .map_err(content_err(&route.slug))?;
        out.push_str(&format!("<p class=\"{class}\">{html}</p>"));
    }
    out.push_str("</blockquote>");
    Ok(out)
}

/// Body sections with anchored headings. The very first paragraph of the
/// body gets the dropcap treatment.
fn render_body(
    doc: &Document,
    route: &RouteMeta,
    dropcap: Dropcap,
) -> Result<String, AssembleError> {
    let mut out = String::new();
    let mut pending_dropcap = dropcap;
    for section in &doc.sections {
        let anchor = section_anchor(&section.header);
        // h1 is the page title; section headings start at h2.
        let h = section.level.clamp(1, 5) + 1;
        out.push_str(&format!(
            "<section id=\"{anchor}\"><h{h}>{}</h{h}>",
            section.header
        ));
        for par in &section.pars {
            let html = richtext::render_paragraph(par, pending_dropcap)
                .map_err(content_err(&route.slug))?;
            if !html.is_empty() {
                pending_dropcap = Dropcap::Off;
            }
            out.push_str(&format!("<p class=\"block\">{html}</p>"));
        }
        out.push_str("</section>");
    }
    Ok(out)
}

fn fill_head(
    templates: &TemplateSet,
    doc: &Document,
    route: &RouteMeta,
    author_names: &str,
) -> String {
    let img = doc.img.clone().unwrap_or_default();
    templates
        .head
        .replace("$$TITLE$$", &doc.title)
        .replace("$$DESCRIPTION$$", &doc.description())
        .replace("$$KEYWORDS$$", &doc.tags.join(", "))
        .replace("$$AUTHOR$$", author_names)
        .replace("$$DATE$$", doc.date.as_deref().unwrap_or(""))
        .replace("$$PAGE_HREF$$", &route.page_href())
        .replace("$$IMG$$", &img.href)
        .replace("$$IMG_ALT$$", &img.title)
        .replace("$$IMG_WIDTH$$", &img.width)
        .replace("$$IMG_HEIGHT$$", &img.height)
}

fn fill_navigation(templates: &TemplateSet, lang: Lang) -> String {
    let seg = |key| {
        let mut s = lang.code().to_string();
        s.push('/');
        s.push_str(label(lang, key));
        s
    };
    templates
        .header_navigation
        .replace("$$HOMEPAGE_LOGO$$", "/static/img/logo/logo.svg#logo")
        .replace("$$HOMEPAGE_DESC$$", label(lang, Label::HomepageDesc))
        .replace("$$HOMEPAGE_LINK$$", lang.code())
        .replace("$$ALL_ARTICLES_TITLE$$", label(lang, Label::AllArticlesTitle))
        .replace("$$ALL_ARTICLES_DESC$$", label(lang, Label::AllArticlesDesc))
        .replace("$$ALL_ARTICLES_LINK$$", &seg(Label::AllArticlesLink))
        .replace("$$NEWEST_TITLE$$", label(lang, Label::NewestTitle))
        .replace("$$NEWEST_DESC$$", label(lang, Label::NewestDesc))
        .replace("$$NEWEST_LINK$$", &seg(Label::NewestLink))
        .replace("$$TOOLS_TITLE$$", label(lang, Label::ToolsTitle))
        .replace("$$TOOLS_DESC$$", label(lang, Label::ToolsDesc))
        .replace("$$TOOLS_LINK$$", &seg(Label::ToolsLink))
        .replace("$$SHOP_TITLE$$", label(lang, Label::ShopTitle))
        .replace("$$SHOP_DESC$$", label(lang, Label::ShopDesc))
        .replace("$$SHOP_LINK$$", &seg(Label::ShopLink))
        .replace("$$ABOUT_TITLE$$", label(lang, Label::AboutTitle))
        .replace("$$ABOUT_DESC$$", label(lang, Label::AboutDesc))
        .replace("$$ABOUT_LINK$$", &seg(Label::AboutLink))
}

fn fill_metadata(
    templates: &TemplateSet,
    doc: &Document,
    lang: Lang,
    author_links: &str,
) -> String {
    templates
        .page_metadata
        .replace("$$DATE_TITLE$$", doc.date.as_deref().unwrap_or(""))
        .replace("$$DATE_DESC$$", label(lang, Label::DateDesc))
        .replace("$$BACKLINKS_TITLE$$", label(lang, Label::BacklinksTitle))
        .replace("$$BACKLINKS_DESC$$", label(lang, Label::BacklinksDesc))
        .replace("$$SIMILAR_TITLE$$", label(lang, Label::SimilarTitle))
        .replace("$$SIMILAR_DESC$$", label(lang, Label::SimilarDesc))
        .replace("$$BIBLIOGRAPHY_TITLE$$", label(lang, Label::BibliographyTitle))
        .replace("$$BIBLIOGRAPHY_DESC$$", label(lang, Label::BibliographyDesc))
        .replace("$$AUTHOR_LINKS$$", author_links)
}

struct PageParts<'a> {
    head: String,
    title: &'a str,
    tag_links: String,
    description: String,
    metadata: String,
    toc: String,
    abstract_block: String,
    body: String,
}

fn fill_shell(templates: &TemplateSet, route: &RouteMeta, parts: PageParts<'_>) -> String {
    let lang = route.lang;
    let description_block = if parts.description.is_empty() {
        String::new()
    } else {
        format!("<p class=\"page-description\">{}</p>", parts.description)
    };
    templates
        .page
        .replace("$$LANG$$", lang.code())
        .replace("$$SLUG$$", &route.slug)
        .replace("$$SKIP_TO_MAIN_CONTENT$$", label(lang, Label::SkipToContent))
        .replace("$$TITLE$$", parts.title)
        .replace("<!-- HEAD_TEMPLATE_HTML -->", &parts.head)
        .replace("<!-- HEADER_NAVIGATION -->", &fill_navigation(templates, lang))
        .replace("<!-- LINK_TAGS -->", &parts.tag_links)
        .replace("<!-- PAGE_DESCRIPTION -->", &description_block)
        .replace("<!-- PAGE_METADATA -->", &parts.metadata)
        .replace("<!-- TABLE_OF_CONTENTS -->", &parts.toc)
        .replace("<!-- BODY_ABSTRACT -->", &parts.abstract_block)
        .replace("<!-- BODY_CONTENT -->", &parts.body)
        .replace("<!-- BODY_NOSCRIPT -->", &templates.body_noscript)
}

/// Assemble a regular article page.
pub fn assemble_article(
    templates: &TemplateSet,
    doc: &Document,
    route: &RouteMeta,
    catalog: &Catalog,
    authors: &AuthorDirectory,
    dropcap: Dropcap,
) -> Result<String, AssembleError> {
    let author_names = resolved_author_names(doc, route, authors)?;
    let author_links = render_author_links(doc, route, authors)?;
    // Prayer pages carry no description block under the title.
    let description = if doc.is_prayer() {
        String::new()
    } else {
        doc.description()
    };
    let parts = PageParts {
        head: fill_head(templates, doc, route, &author_names),
        title: &doc.title,
        tag_links: render_tag_links(doc, route, catalog)?,
        description,
        metadata: fill_metadata(templates, doc, route.lang, &author_links),
        toc: render_toc(&doc.sections),
        abstract_block: render_abstract(doc, route)?,
        body: render_body(doc, route, dropcap)?,
    };
    Ok(fill_shell(templates, route, parts))
}

/// Assemble a rosary devotional page: same shell, pre-built body, no table
/// of contents and no metadata block.
pub fn assemble_devotional(
    templates: &TemplateSet,
    doc: &Document,
    route: &RouteMeta,
    catalog: &Catalog,
    authors: &AuthorDirectory,
    body: String,
) -> Result<String, AssembleError> {
    let author_names = resolved_author_names(doc, route, authors)?;
    let parts = PageParts {
        head: fill_head(templates, doc, route, &author_names),
        title: &doc.title,
        tag_links: render_tag_links(doc, route, catalog)?,
        description: String::new(),
        metadata: String::new(),
        toc: String::new(),
        abstract_block: render_abstract(doc, route)?,
        body,
    };
    Ok(fill_shell(templates, route, parts))
}

/// Assemble an aggregate or curated page (tag listing, newest, authors,
/// resources, shop, about, homepage) from a pre-rendered body.
pub fn assemble_aggregate(
    templates: &TemplateSet,
    route: &RouteMeta,
    title: &str,
    description: &str,
    body: String,
) -> String {
    let doc = Document {
        title: title.to_string(),
        ..Default::default()
    };
    let parts = PageParts {
        head: fill_head(templates, &doc, route, ""),
        title,
        tag_links: String::new(),
        description: description.to_string(),
        metadata: String::new(),
        toc: String::new(),
        abstract_block: String::new(),
        body,
    };
    fill_shell(templates, route, parts)
}
