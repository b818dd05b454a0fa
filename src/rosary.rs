//! Sequential navigation chain for the rosary devotional pages.
//!
//! The rosary page is one long document of addressable prayer sections, each
//! carrying explicit `id` / `prev_id` / `next_id` anchors so the reader can
//! step through it bead by bead. The topology is declarative: a
//! [`ChainSpec`] names the decade count, the prayers per decade, and the
//! waypoint interval, and [`chain_topology`] expands it into blocks. All ids
//! are computed purely from position — no recursion, no mutable state — so
//! the full id table is asserted in tests.
//!
//! Chain shape per decade: one leading invocation (Our Father), ten prayer
//! blocks, one closing doxology (Glory Be), one transition (Fatima prayer),
//! and after every `waypoint_interval`-th decade a navigational waypoint.
//! Boundaries: the first decade's invocation links back into the fixed intro
//! block (`intro-10`), and the final decade's transition links forward into
//! the fixed outro block (`outro-01`) instead of its waypoint.
//!
//! Reflection texts come from an external devotional-content table keyed by
//! decade and slot. The fifteen Hail-Mary insertions are fixed liturgical
//! text and live here as constants.

use crate::locale::{Lang, Localized};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Last fixed intro block; the chain entry point links back to it.
pub const INTRO_EXIT_ID: &str = "intro-10";
/// First fixed outro block; the chain exit links forward to it.
pub const OUTRO_ENTRY_ID: &str = "outro-01";

#[derive(Error, Debug)]
pub enum RosaryError {
    #[error("devotional table has no decade {0}")]
    MissingDecade(u8),
    #[error("devotional table has no reflection for decade {decade}, slot {slot}")]
    MissingPrayer { decade: u8, slot: u8 },
}

/// Declarative chain topology. The traditional rosary is 15 decades of 10
/// prayers with a waypoint after every 5th decade; the shape is data so
/// tests can exercise degenerate chains.
#[derive(Debug, Clone, Copy)]
pub struct ChainSpec {
    pub decades: u8,
    pub prayers_per_decade: u8,
    pub waypoint_interval: u8,
}

impl Default for ChainSpec {
    fn default() -> Self {
        ChainSpec {
            decades: 15,
            prayers_per_decade: 10,
            waypoint_interval: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Our Father opening a decade.
    Invocation,
    /// Numbered Hail Mary with its reflection text.
    Prayer { slot: u8 },
    /// Glory Be closing a decade.
    Closing,
    /// Fatima prayer bridging to the next decade.
    Transition,
    /// Navigational anchor inserted after every waypoint-interval decades.
    Waypoint,
}

/// One chain node with its computed neighbor ids.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainBlock {
    pub kind: BlockKind,
    pub decade: u8,
    pub id: String,
    pub prev_id: String,
    pub next_id: String,
}

fn invocation_id(decade: u8) -> String {
    format!("decade-{decade}-ourfather")
}

fn prayer_id(decade: u8, slot: u8) -> String {
    format!("decade-{decade}-prayer-{slot}")
}

fn closing_id(decade: u8) -> String {
    format!("decade-{decade}-glorybe")
}

fn transition_id(decade: u8) -> String {
    format!("decade-{decade}-fatima")
}

fn waypoint_id(decade: u8) -> String {
    format!("nav-{decade}")
}

/// Expand a [`ChainSpec`] into the full ordered chain.
pub fn chain_topology(spec: &ChainSpec) -> Vec<ChainBlock> {
    let mut blocks = Vec::new();
    let last = spec.decades;

    for decade in 1..=last {
        let at_waypoint = spec.waypoint_interval > 0 && decade % spec.waypoint_interval == 0;
        let prev_decade_waypoint =
            spec.waypoint_interval > 0 && decade > 1 && (decade - 1) % spec.waypoint_interval == 0;

        blocks.push(ChainBlock {
            kind: BlockKind::Invocation,
            decade,
            id: invocation_id(decade),
            prev_id: if decade == 1 {
                INTRO_EXIT_ID.to_string()
            } else if prev_decade_waypoint {
                waypoint_id(decade - 1)
            } else {
                transition_id(decade - 1)
            },
            next_id: prayer_id(decade, 1),
        });

        for slot in 1..=spec.prayers_per_decade {
            blocks.push(ChainBlock {
                kind: BlockKind::Prayer { slot },
                decade,
                id: prayer_id(decade, slot),
                prev_id: if slot == 1 {
                    invocation_id(decade)
                } else {
                    prayer_id(decade, slot - 1)
                },
                next_id: if slot == spec.prayers_per_decade {
                    closing_id(decade)
                } else {
                    prayer_id(decade, slot + 1)
                },
            });
        }

        blocks.push(ChainBlock {
            kind: BlockKind::Closing,
            decade,
            id: closing_id(decade),
            prev_id: prayer_id(decade, spec.prayers_per_decade),
            next_id: transition_id(decade),
        });

        blocks.push(ChainBlock {
            kind: BlockKind::Transition,
            decade,
            id: transition_id(decade),
            prev_id: closing_id(decade),
            next_id: if decade == last {
                OUTRO_ENTRY_ID.to_string()
            } else if at_waypoint {
                waypoint_id(decade)
            } else {
                invocation_id(decade + 1)
            },
        });

        if at_waypoint {
            blocks.push(ChainBlock {
                kind: BlockKind::Waypoint,
                decade,
                id: waypoint_id(decade),
                prev_id: transition_id(decade),
                next_id: if decade == last {
                    OUTRO_ENTRY_ID.to_string()
                } else {
                    invocation_id(decade + 1)
                },
            });
        }
    }

    blocks
}

/// Devotional content: decade number → localized decade name plus numbered
/// reflections. Deserialized from `mysteries.json` next to the articles.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DevotionalTable {
    pub decades: BTreeMap<u8, Decade>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Decade {
    pub name: Localized,
    pub prayers: BTreeMap<u8, Reflection>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Reflection {
    pub de: String,
    pub en: String,
    #[serde(default)]
    pub source: String,
}

impl Reflection {
    fn text(&self, lang: Lang) -> &str {
        match lang {
            Lang::De => &self.de,
            Lang::En => &self.en,
        }
    }
}

/// Snippet templates for the chain blocks. All placeholder tokens are
/// replaced wherever they occur (snippets repeat `$$PREV_ID$$`/`$$NEXT_ID$$`
/// in both data attributes and anchor hrefs).
#[derive(Debug, Default, Clone)]
pub struct RosaryTemplates {
    pub main: String,
    pub outro: String,
    pub ourfather: String,
    pub glorybe: String,
    pub fatima: String,
    pub nav: String,
    pub prayer: String,
}

/// Replace every `(token, value)` pair in `text`.
pub fn replace_all(mut text: String, pairs: &[(&str, &str)]) -> String {
    for (token, value) in pairs {
        text = text.replace(token, value);
    }
    text
}

// The phrase inserted after "…the fruit of thy womb, Jesus," — one per
// decade, fixed liturgical text.
static ADDITIONS_DE: [&str; 15] = [
    "den du, o Jungfrau, vom Heiligen Geist empfangen hast.",
    "den du, o Jungfrau, zu Elisabeth getragen hast.",
    "den du, o Jungfrau, in Bethlehem geboren hast.",
    "den du, o Jungfrau, im Tempel aufgeopfert hast.",
    "den du, o Jungfrau, im Tempel wiedergefunden hast.",
    "der für uns Blut geschwitzt hat.",
    "der für uns gegeißelt worden ist.",
    "der für uns mit Dornen gekrönt worden ist.",
    "der für uns das schwere Kreuz getragen hat.",
    "der für uns am Kreuz gestorben ist.",
    "der von den Toten auferstanden ist.",
    "der in den Himmel aufgefahren ist.",
    "der uns den Heiligen Geist gesandt hat.",
    "der dich, o Jungfrau, in den Himmel aufgenommen hat.",
    "der dich, o Jungfrau, im Himmel gekrönt hat.",
];

static ADDITIONS_EN: [&str; 15] = [
    "whom you, O Virgin, received from the Holy Spirit.",
    "whom you, O Virgin, carried to Elizabeth.",
    "to whom, O Virgin, you gave birth in Bethlehem.",
    "whom you, O Virgin, offered up in the temple.",
    "whom you, O Virgin, found again in the temple.",
    "who sweated blood for us.",
    "who was scourged for us.",
    "who was crowned with thorns for us.",
    "who bore the heavy cross for us.",
    "who died for us on the cross.",
    "who rose from the dead.",
    "who ascended into heaven.",
    "who sent us the Holy Spirit.",
    "who took you, O Virgin, up into heaven.",
    "who crowned you, O Virgin, in heaven.",
];

fn hail_mary_addition(lang: Lang, decade: u8) -> &'static str {
    let idx = usize::from(decade.saturating_sub(1)).min(14);
    match lang {
        Lang::De => ADDITIONS_DE[idx],
        Lang::En => ADDITIONS_EN[idx],
    }
}

fn hail_mary_halves(lang: Lang) -> (&'static str, &'static str) {
    match lang {
        Lang::De => (
            "Gegrüßet seiest du Maria, voll der Gnaden, der Herr ist mit dir. \
             Du bist gebenedeit unter den Weibern und gebenedeit ist die Frucht \
             deines Leibes Jesus, ",
            " Heilige Maria, Mutter Gottes, bitte für uns Sünder, \
             jetzt und in der Stunde unseres Todes.",
        ),
        Lang::En => (
            "Hail, Mary, full of grace, the Lord is with thee. \
             Blessed art thou amongst women and blessed is the fruit \
             of thy womb, Jesus, ",
            " Holy Mary, Mother of God, pray for us sinners, \
             now and at the hour of our death.",
        ),
    }
}

fn render_block(
    block: &ChainBlock,
    lang: Lang,
    templates: &RosaryTemplates,
    table: &DevotionalTable,
) -> Result<String, RosaryError> {
    let decade = table
        .decades
        .get(&block.decade)
        .ok_or(RosaryError::MissingDecade(block.decade))?;
    let decade_label = decade.name.get(lang);

    let common: [(&str, &str); 4] = [
        ("$$ID$$", &block.id),
        ("$$PREV_ID$$", &block.prev_id),
        ("$$NEXT_ID$$", &block.next_id),
        ("$$DECADE$$", decade_label),
    ];

    let html = match block.kind {
        BlockKind::Invocation => replace_all(templates.ourfather.clone(), &common),
        BlockKind::Closing => replace_all(templates.glorybe.clone(), &common),
        BlockKind::Transition => replace_all(templates.fatima.clone(), &common),
        BlockKind::Waypoint => replace_all(templates.nav.clone(), &common),
        BlockKind::Prayer { slot } => {
            let reflection = decade
                .prayers
                .get(&slot)
                .ok_or(RosaryError::MissingPrayer {
                    decade: block.decade,
                    slot,
                })?;
            let (hm_start, hm_end) = hail_mary_halves(lang);
            let slot_str = slot.to_string();
            let mut html = replace_all(templates.prayer.clone(), &common);
            html = replace_all(
                html,
                &[
                    ("$$INDEX$$", slot_str.as_str()),
                    ("$$TEXT_TOP$$", reflection.text(lang)),
                    ("$$SOURCE$$", &reflection.source),
                    ("$$HAIL_MARY_START$$", hm_start),
                    ("$$DECADE_ADDITION$$", hail_mary_addition(lang, block.decade)),
                    ("$$HAIL_MARY_END$$", hm_end),
                ],
            );
            html
        }
    };
    Ok(html)
}

/// Render the chain as an ordered list of section fragments.
pub fn build_chain(
    lang: Lang,
    spec: &ChainSpec,
    templates: &RosaryTemplates,
    table: &DevotionalTable,
) -> Result<Vec<String>, RosaryError> {
    chain_topology(spec)
        .iter()
        .map(|block| render_block(block, lang, templates, table))
        .collect()
}

/// Render the complete rosary body: fixed intro, the expanded chain, and
/// the fixed outro, all substituted into the main template.
pub fn render_rosary(
    lang: Lang,
    spec: &ChainSpec,
    templates: &RosaryTemplates,
    table: &DevotionalTable,
) -> Result<String, RosaryError> {
    let start_label = match lang {
        Lang::De => "Anfang",
        Lang::En => "Start",
    };

    let intro_block = |template: &str, id: &str, prev: &str, next: &str| {
        replace_all(
            template.to_string(),
            &[
                ("$$ID$$", id),
                ("$$PREV_ID$$", prev),
                ("$$NEXT_ID$$", next),
                ("$$DECADE$$", start_label),
            ],
        )
    };

    let mut html = templates.main.clone();
    html = html.replace(
        "<!-- NAV_TOP -->",
        &intro_block(&templates.nav, "intro-00", "intro-00", "intro-01"),
    );
    html = html.replace(
        "<!-- INTRO_OURFATHER -->",
        &intro_block(&templates.ourfather, "intro-05", "intro-04", "intro-06"),
    );
    html = html.replace(
        "<!-- INTRO_GLORYBE -->",
        &intro_block(&templates.glorybe, "intro-09", "intro-08", "intro-10"),
    );
    html = html.replace(
        "<!-- INTRO_FATIMA -->",
        &intro_block(&templates.fatima, INTRO_EXIT_ID, "intro-09", "decade-1-ourfather"),
    );
    html = html.replace(
        "<!-- NAV_BOTTOM -->",
        &intro_block(&templates.nav, "intro-11", INTRO_EXIT_ID, "decade-1-ourfather"),
    );

    let chain = build_chain(lang, spec, templates, table)?.concat();
    html = html.replace("<!-- DECADES -->", &chain);
    html = html.replace("<!-- OUTRO -->", &templates.outro);

    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{builtin_rosary_templates, synthetic_devotional_table};

    fn find<'a>(blocks: &'a [ChainBlock], id: &str) -> &'a ChainBlock {
        blocks
            .iter()
            .find(|b| b.id == id)
            .unwrap_or_else(|| panic!("no block with id {id}"))
    }

    #[test]
    fn default_spec_block_count() {
        let blocks = chain_topology(&ChainSpec::default());
        // 15 × (1 invocation + 10 prayers + 1 closing + 1 transition) + 3 waypoints
        assert_eq!(blocks.len(), 15 * 13 + 3);
    }

    #[test]
    fn first_prayer_links_back_to_decade_invocation() {
        let blocks = chain_topology(&ChainSpec::default());
        let first = find(&blocks, "decade-1-prayer-1");
        assert_eq!(first.prev_id, "decade-1-ourfather");
        assert_eq!(first.next_id, "decade-1-prayer-2");
    }

    #[test]
    fn first_invocation_links_into_intro() {
        let blocks = chain_topology(&ChainSpec::default());
        let entry = find(&blocks, "decade-1-ourfather");
        assert_eq!(entry.prev_id, INTRO_EXIT_ID);
        assert_eq!(entry.next_id, "decade-1-prayer-1");
    }

    #[test]
    fn waypoint_decade_transition_targets_waypoint() {
        let blocks = chain_topology(&ChainSpec::default());
        let fatima5 = find(&blocks, "decade-5-fatima");
        assert_eq!(fatima5.next_id, "nav-5");
        let fatima10 = find(&blocks, "decade-10-fatima");
        assert_eq!(fatima10.next_id, "nav-10");
    }

    #[test]
    fn final_transition_exits_into_outro() {
        let blocks = chain_topology(&ChainSpec::default());
        let fatima15 = find(&blocks, "decade-15-fatima");
        assert_eq!(fatima15.next_id, OUTRO_ENTRY_ID);
    }

    #[test]
    fn waypoints_carry_full_triples() {
        let blocks = chain_topology(&ChainSpec::default());
        let nav5 = find(&blocks, "nav-5");
        assert_eq!(nav5.prev_id, "decade-5-fatima");
        assert_eq!(nav5.next_id, "decade-6-ourfather");
        let nav15 = find(&blocks, "nav-15");
        assert_eq!(nav15.prev_id, "decade-15-fatima");
        assert_eq!(nav15.next_id, OUTRO_ENTRY_ID);
    }

    #[test]
    fn invocation_after_waypoint_links_back_to_it() {
        let blocks = chain_topology(&ChainSpec::default());
        let d6 = find(&blocks, "decade-6-ourfather");
        assert_eq!(d6.prev_id, "nav-5");
        let d2 = find(&blocks, "decade-2-ourfather");
        assert_eq!(d2.prev_id, "decade-1-fatima");
    }

    #[test]
    fn mid_decade_prayers_chain_linearly() {
        let blocks = chain_topology(&ChainSpec::default());
        let p7 = find(&blocks, "decade-3-prayer-7");
        assert_eq!(p7.prev_id, "decade-3-prayer-6");
        assert_eq!(p7.next_id, "decade-3-prayer-8");
        let p10 = find(&blocks, "decade-3-prayer-10");
        assert_eq!(p10.next_id, "decade-3-glorybe");
    }

    #[test]
    fn adjacent_blocks_link_consistently_up_to_the_outro_exit() {
        let blocks = chain_topology(&ChainSpec::default());
        for pair in blocks.windows(2) {
            assert_eq!(
                pair[1].prev_id, pair[0].id,
                "{} should link back to {}",
                pair[1].id, pair[0].id
            );
            // The final transition skips its trailing waypoint and exits
            // straight into the outro; every other forward link targets
            // the block that follows it.
            if pair[0].next_id != OUTRO_ENTRY_ID {
                assert_eq!(
                    pair[0].next_id, pair[1].id,
                    "{} should link forward to {}",
                    pair[0].id, pair[1].id
                );
            }
        }
        let exits: Vec<&str> = blocks
            .iter()
            .filter(|b| b.next_id == OUTRO_ENTRY_ID)
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(exits, ["decade-15-fatima", "nav-15"]);
    }

    #[test]
    fn degenerate_spec_without_waypoints() {
        let spec = ChainSpec {
            decades: 2,
            prayers_per_decade: 3,
            waypoint_interval: 0,
        };
        let blocks = chain_topology(&spec);
        // 2 × (1 invocation + 3 prayers + 1 closing + 1 transition), no waypoints
        assert_eq!(blocks.len(), 2 * 6);
        assert_eq!(find(&blocks, "decade-1-fatima").next_id, "decade-2-ourfather");
        assert_eq!(find(&blocks, "decade-2-fatima").next_id, OUTRO_ENTRY_ID);
    }

    #[test]
    fn rendered_chain_has_one_fragment_per_block() {
        let templates = builtin_rosary_templates();
        let table = synthetic_devotional_table();
        let fragments =
            build_chain(Lang::En, &ChainSpec::default(), &templates, &table).unwrap();
        assert_eq!(fragments.len(), 15 * 13 + 3);
        assert!(fragments[0].contains("id=\"decade-1-ourfather\""));
    }

    #[test]
    fn prayer_fragment_substitutes_reflection_and_addition() {
        let templates = builtin_rosary_templates();
        let table = synthetic_devotional_table();
        let fragments =
            build_chain(Lang::En, &ChainSpec::default(), &templates, &table).unwrap();
        let prayer = fragments
            .iter()
            .find(|f| f.contains("id=\"decade-6-prayer-1\""))
            .unwrap();
        assert!(prayer.contains("reflection en 6/1"));
        assert!(prayer.contains("who sweated blood for us."));
        assert!(!prayer.contains("$$"));
    }

    #[test]
    fn missing_decade_in_table_is_an_error() {
        let templates = builtin_rosary_templates();
        let mut table = synthetic_devotional_table();
        table.decades.remove(&7);
        let err =
            build_chain(Lang::De, &ChainSpec::default(), &templates, &table).unwrap_err();
        assert!(matches!(err, RosaryError::MissingDecade(7)));
    }

    #[test]
    fn full_rosary_page_resolves_all_markers() {
        let templates = builtin_rosary_templates();
        let table = synthetic_devotional_table();
        let html = render_rosary(Lang::De, &ChainSpec::default(), &templates, &table).unwrap();
        assert!(html.contains("id=\"intro-05\""));
        assert!(html.contains("id=\"outro-01\""));
        assert!(html.contains("id=\"decade-15-fatima\""));
        assert!(!html.contains("$$"));
        assert!(!html.contains("<!-- DECADES -->"));
        assert!(!html.contains("<!-- OUTRO -->"));
    }
}
