//! Localized label lookup.
//!
//! Every user-visible label string (navigation titles, tooltip descriptions,
//! metadata captions, route segments) lives in one table indexed by
//! `(Lang, Label)`. Adding a language means adding one arm per label here —
//! nothing else in the crate switches on language codes.
//!
//! Only German has a dedicated variant; every other language code falls back
//! to the English strings. This mirrors the content archive, which is
//! authored in exactly two languages.

use serde::{Deserialize, Serialize};

/// Display language. Anything that is not `de` renders English labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    De,
    En,
}

impl Lang {
    pub fn from_code(code: &str) -> Lang {
        match code {
            "de" => Lang::De,
            _ => Lang::En,
        }
    }

    /// Canonical route segment for the language.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::De => "de",
            Lang::En => "en",
        }
    }
}

/// A string pair carried by data files that ship both translations at once
/// (tag display names, decade names, special page titles).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localized {
    pub de: String,
    pub en: String,
}

impl Localized {
    pub fn get(&self, lang: Lang) -> &str {
        match lang {
            Lang::De => &self.de,
            Lang::En => &self.en,
        }
    }
}

/// Keys into the label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    SkipToContent,
    HomepageDesc,
    AllArticlesTitle,
    AllArticlesDesc,
    AllArticlesLink,
    NewestTitle,
    NewestDesc,
    NewestLink,
    ToolsTitle,
    ToolsDesc,
    ToolsLink,
    ShopTitle,
    ShopDesc,
    ShopLink,
    AboutTitle,
    AboutDesc,
    AboutLink,
    AuthorsTitle,
    AuthorsLink,
    DateDesc,
    BacklinksTitle,
    BacklinksDesc,
    SimilarTitle,
    SimilarDesc,
    BibliographyTitle,
    BibliographyDesc,
    TagLinkDesc,
    ContactLink,
}

/// Look up a label for a language.
///
/// Route segments (`*Link`) are returned without the language prefix; callers
/// prepend `{lang}/` when building hrefs.
pub fn label(lang: Lang, key: Label) -> &'static str {
    use Label::*;
    match lang {
        Lang::De => match key {
            SkipToContent => "Zum Inhalt springen",
            HomepageDesc => "Startseite: Kategorisierte Liste aller deutschen Artikel",
            AllArticlesTitle => "Themen",
            AllArticlesDesc => "Durchsuche alle deutschen Artikel",
            AllArticlesLink => "themen",
            NewestTitle => "Neuigkeiten",
            NewestDesc => "Artikel sortiert nach Datum",
            NewestLink => "neu",
            ToolsTitle => "Ressourcen",
            ToolsDesc => "Software und Hilfsmittel zum Latein-Lernen, Gebetssammlungen, \
                          Online Mess- und Bibelbücher, Online-Bücherei u.v.m",
            ToolsLink => "ressourcen",
            ShopTitle => "Shop",
            ShopDesc => "Unterstütze unser Apostolat mit deinem Einkauf in unserem Shop!",
            ShopLink => "shop",
            AboutTitle => "Impressum",
            AboutDesc => "Über diese Seite, Kontakt und Rechtliches",
            AboutLink => "impressum",
            AuthorsTitle => "Autoren",
            AuthorsLink => "autoren",
            DateDesc => "Datum der letzten Änderung",
            BacklinksTitle => "verweise",
            BacklinksDesc => "Liste der anderen Seiten, die auf diese Seite verweisen",
            SimilarTitle => "ähnlich",
            SimilarDesc => "Ähnliche Artikel",
            BibliographyTitle => "bibliografie",
            BibliographyDesc => "Bibliographie der auf dieser Seite zitierten Links",
            TagLinkDesc => "Link zum Thema",
            ContactLink => "impressum",
        },
        Lang::En => match key {
            SkipToContent => "Skip to main content",
            HomepageDesc => "Homepage",
            AllArticlesTitle => "Categories",
            AllArticlesDesc => "Search all English articles by category / tag",
            AllArticlesLink => "categories",
            NewestTitle => "Newest",
            NewestDesc => "Articles sorted by date",
            NewestLink => "newest",
            ToolsTitle => "Tools",
            ToolsDesc => "Software and aids for learning Latin, prayer collections, \
                          online Mass and Bible books, online library and much more",
            ToolsLink => "tools",
            ShopTitle => "Shop",
            ShopDesc => "Support our apostolate with your purchase in our store!",
            ShopLink => "shop",
            AboutTitle => "Contact",
            AboutDesc => "Imprint, contact and legal information",
            AboutLink => "contact",
            AuthorsTitle => "Authors",
            AuthorsLink => "authors",
            DateDesc => "Date of last modification",
            BacklinksTitle => "backlinks",
            BacklinksDesc => "List of other pages which link to this page",
            SimilarTitle => "similar",
            SimilarDesc => "Similar articles for this link",
            BibliographyTitle => "bibliography",
            BibliographyDesc => "Bibliography of links cited in this page",
            TagLinkDesc => "Link to tag",
            ContactLink => "contact",
        },
    }
}
