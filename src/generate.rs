//! Site generation pipeline.
//!
//! Takes the loaded inputs and produces every output file as an in-memory
//! `(relative path, content)` map; [`write_site`] persists it. Keeping
//! rendering separate from I/O lets the tests assert on complete sites
//! without touching the filesystem.
//!
//! ## Generated Pages
//!
//! Per language:
//!
//! - **Article pages** (`/{lang}/{slug}.html`), rosary slugs rendered through
//!   the navigation chain builder instead of the regular article path
//! - **Topics overview** (`/{lang}/<topics segment>.html`): one section per
//!   tag, in catalog order; the tag chips on article pages point here
//! - **Newest listing** (`/{lang}/<newest segment>.html`): one section per
//!   year, most recent year first
//! - **Author directory** (`/{lang}/<authors segment>.html`)
//! - **Curated pages** from the catalog (resources, shop, about) at their
//!   localized route segments
//! - **Homepage** (`/{lang}/index.html`) from the featured groupings
//! - **Search index** (`/{lang}/index.json`)
//!
//! Plus one site-wide `.gitignore` covering all generated artifacts.
//!
//! ## Two-phase pass
//!
//! Article pages render in parallel with [rayon](https://docs.rs/rayon);
//! index recording stays a sequential fold over the rendered results, so the
//! accumulate-then-drain contract of [`SiteIndex`] holds regardless of
//! worker count.

use crate::artifacts;
use crate::assemble::{
    AssembleError, RouteMeta, TemplateSet, assemble_aggregate, assemble_article,
    assemble_devotional,
};
use crate::config::SiteConfig;
use crate::index::{IndexError, SiteIndex, TagIndex};
use crate::load::LoadedArticles;
use crate::locale::{Label, Lang, label};
use crate::rosary::{self, ChainSpec, RosaryError};
use crate::special::{self, SectionLink};
use crate::types::{AuthorDirectory, Catalog};
use maud::html;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Rosary(#[from] RosaryError),
    #[error("search index serialization failed: {0}")]
    Search(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the pipeline needs, borrowed from the caller.
pub struct GenerateInput<'a> {
    pub articles: &'a LoadedArticles,
    pub catalog: &'a Catalog,
    pub authors: &'a AuthorDirectory,
    pub devotional: &'a rosary::DevotionalTable,
    pub config: &'a SiteConfig,
    pub production: bool,
    /// Build version stamped into the per-language search indices.
    pub version: &'a str,
}

/// The complete generated site, keyed by output path relative to the
/// output root.
#[derive(Debug, Default)]
pub struct GeneratedSite {
    pub files: BTreeMap<String, String>,
    pub warnings: Vec<String>,
}

impl GeneratedSite {
    pub fn page_count(&self) -> usize {
        self.files.keys().filter(|p| p.ends_with(".html")).count()
    }
}

/// Run the full pipeline: parallel article rendering, sequential index
/// recording, then aggregate page emission.
pub fn generate(input: &GenerateInput<'_>) -> Result<GeneratedSite, GenerateError> {
    let templates = TemplateSet::builtin();
    templates.verify()?;

    let mut site = GeneratedSite::default();

    // Phase 1: render every article page. Rendering is independent per
    // article; index recording is not, so it waits for phase 2.
    let jobs: Vec<(&str, &str, &crate::types::Document)> = input
        .articles
        .langs
        .iter()
        .flat_map(|(lang, slugs)| {
            slugs
                .iter()
                .map(move |(slug, doc)| (lang.as_str(), slug.as_str(), doc))
        })
        .collect();

    let rendered: Vec<Result<(String, String), GenerateError>> = jobs
        .par_iter()
        .map(|&(lang_code, slug, doc)| {
            let lang = Lang::from_code(lang_code);
            let route = RouteMeta::new(lang, slug);
            let html = if input.config.is_rosary_slug(slug) {
                let body = rosary::render_rosary(
                    lang,
                    &ChainSpec::default(),
                    &templates.rosary,
                    input.devotional,
                )?;
                assemble_devotional(
                    &templates,
                    doc,
                    &route,
                    input.catalog,
                    input.authors,
                    body,
                )?
            } else {
                assemble_article(
                    &templates,
                    doc,
                    &route,
                    input.catalog,
                    input.authors,
                    input.config.dropcap(),
                )?
            };
            Ok((format!("{lang_code}/{slug}.html"), html))
        })
        .collect();

    for result in rendered {
        let (path, html) = result?;
        site.files.insert(path, html);
    }

    // Phase 2: sequential index recording.
    let mut index = SiteIndex::new();
    for (lang_code, slugs) in &input.articles.langs {
        for (slug, doc) in slugs {
            if let Some(warning) = index.record(doc, slug, lang_code, input.catalog)? {
                site.warnings.push(warning.to_string());
            }
        }
    }
    let (tags, dates) = index.drain();

    // Phase 3: aggregate pages per language.
    for lang_code in input.articles.langs.keys() {
        let lang = Lang::from_code(lang_code);

        emit_topics_page(&mut site, &templates, lang, lang_code, &tags, input.catalog);
        emit_newest_page(&mut site, &templates, lang, lang_code, &dates);
        emit_authors_page(&mut site, &templates, lang, lang_code, input.authors);
        emit_catalog_pages(&mut site, &templates, lang, lang_code, input.catalog);
        emit_homepage(&mut site, &templates, lang, lang_code, input);

        let index_json = serde_json::to_string(&artifacts::search_index(
            input.version,
            &input.articles.langs[lang_code],
        )?)?;
        site.files.insert(format!("{lang_code}/index.json"), index_json);
    }

    site.files.insert(
        ".gitignore".to_string(),
        artifacts::ignore_list(&input.articles.langs),
    );

    // Every internal href carried the root token until now.
    let root = input.config.root_href(input.production);
    for content in site.files.values_mut() {
        if content.contains("$$ROOT_HREF$$") {
            *content = content.replace("$$ROOT_HREF$$", root);
        }
    }

    Ok(site)
}

fn emit_topics_page(
    site: &mut GeneratedSite,
    templates: &TemplateSet,
    lang: Lang,
    lang_code: &str,
    tags: &TagIndex,
    catalog: &Catalog,
) {
    let sections = html! {
        @if let Some(buckets) = tags.langs.get(lang_code) {
            @for (tag, articles) in buckets {
                @let name = catalog.tag_name(tag).map(|n| n.get(lang)).unwrap_or(tag.as_str());
                @let links: Vec<SectionLink> = articles
                    .iter()
                    .map(|a| SectionLink { slug: a.slug.clone(), title: a.title.clone() })
                    .collect();
                (special::listing_section(lang, tag, name, &links))
            }
        }
    };
    let segment = label(lang, Label::AllArticlesLink);
    let page = assemble_aggregate(
        templates,
        &RouteMeta::new(lang, segment),
        label(lang, Label::AllArticlesTitle),
        label(lang, Label::AllArticlesDesc),
        sections.into_string(),
    );
    site.files.insert(format!("{lang_code}/{segment}.html"), page);
}

fn emit_newest_page(
    site: &mut GeneratedSite,
    templates: &TemplateSet,
    lang: Lang,
    lang_code: &str,
    dates: &crate::index::DateIndex,
) {
    let sections = html! {
        @if let Some(years) = dates.langs.get(lang_code) {
            @for year in years {
                @let links: Vec<SectionLink> = year
                    .months
                    .iter()
                    .flat_map(|(month, days)| {
                        days.iter().map(move |(day, article)| SectionLink {
                            slug: article.slug.clone(),
                            title: format!("{month}-{day}: {}", article.title),
                        })
                    })
                    .collect();
                (special::listing_section(lang, &format!("y{}", year.year), &year.year, &links))
            }
        }
    };
    let segment = label(lang, Label::NewestLink);
    let page = assemble_aggregate(
        templates,
        &RouteMeta::new(lang, segment),
        label(lang, Label::NewestTitle),
        label(lang, Label::NewestDesc),
        sections.into_string(),
    );
    site.files.insert(format!("{lang_code}/{segment}.html"), page);
}

fn emit_authors_page(
    site: &mut GeneratedSite,
    templates: &TemplateSet,
    lang: Lang,
    lang_code: &str,
    authors: &AuthorDirectory,
) {
    let segment = label(lang, Label::AuthorsLink);
    let page = assemble_aggregate(
        templates,
        &RouteMeta::new(lang, segment),
        label(lang, Label::AuthorsTitle),
        "",
        special::render_authors(lang, authors),
    );
    site.files.insert(format!("{lang_code}/{segment}.html"), page);
}

/// Route segment for a curated catalog page. The catalog keys pages by a
/// language-neutral id; the emitted file uses the localized segment so the
/// header navigation links resolve.
fn catalog_page_segment(lang: Lang, page_id: &str) -> String {
    match page_id {
        "ressources" => label(lang, Label::ToolsLink).to_string(),
        "shop" => label(lang, Label::ShopLink).to_string(),
        "about" => label(lang, Label::AboutLink).to_string(),
        other => other.to_string(),
    }
}

fn emit_catalog_pages(
    site: &mut GeneratedSite,
    templates: &TemplateSet,
    lang: Lang,
    lang_code: &str,
    catalog: &Catalog,
) {
    for (page_id, by_lang) in &catalog.pages {
        let Some(page) = by_lang.get(lang_code) else {
            continue;
        };
        let segment = catalog_page_segment(lang, page_id);
        let html = assemble_aggregate(
            templates,
            &RouteMeta::new(lang, &segment),
            &page.title,
            &page.description,
            special::render_special(lang, page),
        );
        site.files.insert(format!("{lang_code}/{segment}.html"), html);
    }
}

fn emit_homepage(
    site: &mut GeneratedSite,
    templates: &TemplateSet,
    lang: Lang,
    lang_code: &str,
    input: &GenerateInput<'_>,
) {
    let docs = &input.articles.langs[lang_code];
    // Featured slugs not present in this language are skipped; the
    // groupings are shared across languages.
    let sections = html! {
        @for (group, slugs) in &input.catalog.featured {
            @let links: Vec<SectionLink> = slugs
                .iter()
                .filter_map(|slug| {
                    docs.get(slug).map(|doc| SectionLink {
                        slug: slug.clone(),
                        title: doc.title.clone(),
                    })
                })
                .collect();
            @if !links.is_empty() {
                @let name = input.catalog.tag_name(group).map(|n| n.get(lang)).unwrap_or(group.as_str());
                (special::listing_section(lang, group, name, &links))
            }
        }
    };
    let page = assemble_aggregate(
        templates,
        &RouteMeta::new(lang, "index"),
        &input.config.site.title,
        label(lang, Label::HomepageDesc),
        sections.into_string(),
    );
    site.files.insert(format!("{lang_code}/index.html"), page);
}

/// Write every generated file under `out_dir`, creating directories as
/// needed.
pub fn write_site(site: &GeneratedSite, out_dir: &Path) -> Result<(), GenerateError> {
    for (rel_path, content) in &site.files {
        let path = out_dir.join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    }
    Ok(())
}
