//! Inline rich-text rendering.
//!
//! Converts [`TextSpan`]s and [`Paragraph`]s into HTML fragments. The style
//! wrapping order is load-bearing and must not be reordered:
//!
//! ```text
//! strikethrough → (superscript | subscript) → italic → bold
//!               → underline (small-caps) → link
//! ```
//!
//! Superscript and subscript are mutually exclusive; superscript wins when
//! both flags are present. Underline renders as a small-caps span rather
//! than a `<u>` tag — the archive uses "underline" in source content to mean
//! emphasis-by-capitals.
//!
//! ## Links
//!
//! A link whose URL contains `wikipedia.` renders as a live-popup annotated
//! link with a `data-url-html` fragment-loading target. Every other link is
//! an internal cross-reference whose element id is derived from the URL:
//! scheme stripped, `/` mapped to `-`, lower-cased. Two spans linking the
//! same target therefore share an id; the popup script relies on that.
//!
//! ## Dropcaps
//!
//! The opening paragraph of an article gets its first character wrapped in a
//! dropcap span. A quote character in that position is malformed source
//! content (the quote would float at display size); under the strict policy
//! this fails the run with the offending text.

use crate::types::{InlineItem, Paragraph, StyleFlag, TextSpan};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("dropcap would wrap quote character {ch:?} in {text:?}")]
    DropcapQuote { ch: char, text: String },
}

/// Dropcap handling for the first character of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropcap {
    /// No dropcap treatment.
    Off,
    /// Wrap the first character; fail on quote characters.
    Strict,
    /// Wrap the first character; quote characters pass through.
    Lenient,
}

const QUOTE_CHARS: &[char] = &[
    '"', '\'', '`', '\u{201c}', '\u{201d}', '\u{201e}', '\u{2018}', '\u{2019}', '\u{00ab}',
    '\u{00bb}',
];

/// Escape a string for use inside a double-quoted HTML attribute.
fn attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

/// Render one styled span to inline HTML.
///
/// Empty text renders as the empty string so that no empty wrapper tags are
/// emitted. Non-empty spans are terminated with `&nbsp;` before wrapping;
/// the templates rely on that spacing between adjacent inline items.
pub fn render_span(span: &TextSpan, dropcap: Dropcap) -> Result<String, RenderError> {
    if span.text.is_empty() {
        return Ok(String::new());
    }

    let mut target = match dropcap {
        Dropcap::Off => span.text.clone(),
        Dropcap::Strict | Dropcap::Lenient => {
            let mut chars = span.text.chars();
            let Some(first) = chars.next() else {
                return Ok(String::new());
            };
            if dropcap == Dropcap::Strict && QUOTE_CHARS.contains(&first) {
                return Err(RenderError::DropcapQuote {
                    ch: first,
                    text: span.text.clone(),
                });
            }
            format!("<span class=\"dropcap\">{first}</span>{}", chars.as_str())
        }
    };
    target.push_str("&nbsp;");

    if span.has(StyleFlag::Strikethrough) {
        target = format!("<del>{target}</del>");
    }
    if span.has(StyleFlag::Superscript) {
        target = format!("<sup>{target}</sup>");
    } else if span.has(StyleFlag::Subscript) {
        target = format!("<sub>{target}</sub>");
    }
    if span.has(StyleFlag::Italic) {
        target = format!("<em>{target}</em>");
    }
    if span.has(StyleFlag::Bold) {
        target = format!("<strong>{target}</strong>");
    }
    if span.has(StyleFlag::Underline) {
        target = format!("<span class=\"smallcaps\">{target}</span>");
    }
    if span.has(StyleFlag::Link) {
        let href = span.link.as_deref().unwrap_or("");
        let title = span.title.as_deref().unwrap_or("");
        target = render_link(href, title, &target);
    }

    Ok(target)
}

/// Dispatch on link kind: wikipedia URLs get the live-popup treatment,
/// everything else is an internal cross-reference.
pub fn render_link(href: &str, title: &str, text: &str) -> String {
    if href.contains("wikipedia.") {
        render_wikipedia_link(href, title, text)
    } else {
        render_internal_link(href, title, text)
    }
}

/// Deterministic element id for an internal link target.
pub fn internal_link_id(href: &str) -> String {
    href.trim_start_matches("https://")
        .trim_start_matches("http://")
        .replace('/', "-")
        .to_lowercase()
}

fn render_internal_link(href: &str, title: &str, text: &str) -> String {
    let id = internal_link_id(href);
    format!(
        "<a href=\"$$ROOT_HREF$$/{href}\" id=\"{id}\" \
         class=\"link-annotated link-page has-icon has-annotation spawns-popup\" \
         data-link-icon-type=\"text\" data-link-icon=\"\u{1d521}\" \
         data-attribute-title=\"{title}\" style=\"--link-icon: '\u{1d521}';\"\
         >{text}<span class=\"link-icon-hook\">\u{2060}</span></a>&nbsp;",
        href = href,
        id = id,
        title = attr(title),
        text = text,
    )
}

fn render_wikipedia_link(href: &str, title: &str, text: &str) -> String {
    format!(
        "<a href=\"{href}\" \
         class=\"link-annotated-partial link-live has-icon has-annotation \
         content-transform spawns-popup\" \
         data-link-icon=\"wikipedia\" data-link-icon-type=\"svg\" \
         data-url-html=\"{href}#bodyContent\" \
         style=\"--link-icon-url: url('/static/img/icon/icons.svg#wikipedia');\" \
         data-attribute-title=\"{title}\"\
         >{text}<span class=\"link-icon-hook\">\u{2060}</span></a>&nbsp;",
        href = href,
        title = attr(title),
        text = text,
    )
}

/// Render a paragraph as the ordered concatenation of its items.
///
/// Code blocks render as the empty string (declared unimplemented), and so
/// do unknown item kinds. A requested dropcap applies to the first text item
/// only.
pub fn render_paragraph(par: &Paragraph, dropcap: Dropcap) -> Result<String, RenderError> {
    let mut out = String::new();
    let mut pending_dropcap = dropcap;
    for item in &par.0 {
        match item {
            InlineItem::Text(span) => {
                out.push_str(&render_span(span, pending_dropcap)?);
                if !span.text.is_empty() {
                    pending_dropcap = Dropcap::Off;
                }
            }
            InlineItem::Code(_) | InlineItem::Unknown => {}
        }
    }
    Ok(out)
}
