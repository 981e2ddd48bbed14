//! Section splitting of the bulletin `<pre>` text.
//!
//! A bulletin is a header followed by up to five named blocks. Each block is located by
//! its header rule, and the **last** match of a rule wins: recovery bulletins quote a
//! short `Residuals` preview before the full block.
use std::sync::LazyLock;

use regex::Regex;

/// The recognized bulletin sections, in their usual order of appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Observations,
    ObserverDetails,
    OrbitalElements,
    Residuals,
    Ephemeris,
}

static OBSERVATIONS_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^(?:Available\s+|Additional\s+)?Observations?:").expect("valid regex")
});
static OBSERVER_DETAILS_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Observer details?:").expect("valid regex"));
static ORBITAL_ELEMENTS_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^Orbital elements?\b.*:").expect("valid regex"));
static RESIDUALS_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Residuals?\b").expect("valid regex"));
static EPHEMERIS_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Ephemeris:?\s*$").expect("valid regex"));

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Observations,
        SectionKind::ObserverDetails,
        SectionKind::OrbitalElements,
        SectionKind::Residuals,
        SectionKind::Ephemeris,
    ];

    /// Header rule of this section.
    pub fn rule(self) -> &'static Regex {
        match self {
            SectionKind::Observations => &OBSERVATIONS_RULE,
            SectionKind::ObserverDetails => &OBSERVER_DETAILS_RULE,
            SectionKind::OrbitalElements => &ORBITAL_ELEMENTS_RULE,
            SectionKind::Residuals => &RESIDUALS_RULE,
            SectionKind::Ephemeris => &EPHEMERIS_RULE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Observations => "observations",
            SectionKind::ObserverDetails => "observer_details",
            SectionKind::OrbitalElements => "orbital_elements",
            SectionKind::Residuals => "residuals",
            SectionKind::Ephemeris => "ephemeris",
        }
    }
}

/// Sections of one bulletin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    /// Text before the first recognized section, trimmed
    pub header: String,
    /// Found sections in text order, content stripped of surrounding line breaks
    pub found: Vec<(SectionKind, String)>,
}

impl Sections {
    pub fn get(&self, kind: SectionKind) -> Option<&str> {
        self.found
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, text)| text.as_str())
    }

    pub fn contains(&self, kind: SectionKind) -> bool {
        self.get(kind).is_some()
    }

    /// Section content, or an empty string when the section is absent.
    pub fn text(&self, kind: SectionKind) -> &str {
        self.get(kind).unwrap_or_default()
    }
}

/// Split bulletin text into its header and named sections.
///
/// A section runs from the end of its header match to the start of the next
/// section's header match, or to the end of the text.
pub fn split_sections(text: &str) -> Sections {
    let mut positions: Vec<(usize, usize, SectionKind)> = SectionKind::ALL
        .iter()
        .filter_map(|&kind| {
            kind.rule()
                .find_iter(text)
                .last()
                .map(|m| (m.start(), m.end(), kind))
        })
        .collect();
    positions.sort_by_key(|&(start, _, _)| start);

    let found = positions
        .iter()
        .enumerate()
        .map(|(i, &(_, end, kind))| {
            let stop = positions.get(i + 1).map_or(text.len(), |next| next.0);
            // two rules can match at the same offset
            let content = text.get(end..stop.max(end)).unwrap_or_default();
            (kind, content.trim_matches(['\n', '\r']).to_string())
        })
        .collect();

    let header = match positions.first() {
        Some(&(start, _, _)) => text[..start].trim(),
        None => text.trim(),
    };

    Sections {
        header: header.to_string(),
        found,
    }
}
