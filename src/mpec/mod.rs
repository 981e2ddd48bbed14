//! # MPEC bulletins
//!
//! Parsing of **Minor Planet Electronic Circulars** into typed documents, plus the
//! listing scraper and the fetch layer that supplies bulletin text.
//!
//! ## Overview
//! -----------------
//! - [`parse`] turns the `<pre>` text of one bulletin into an [`MpecDocument`]. It is a
//!   pure function: no I/O, and it never fails on bulletin text. Missing pieces degrade
//!   field by field to empty strings or `None`.
//! - [`sections`] splits the text into its header and named sections.
//! - [`extract`] holds the single-field rules (designation, issue date, copyright, …).
//! - [`classify`] labels bulletins as discovery, recovery or editorial.
//! - [`elements`] reads the orbital-elements block.
//! - [`arc`] counts observations and measures their arc.
//! - [`listing`] scrapes MPC HTML pages; [`client`] fetches them with caching.
//!
//! ## Example
//! -----------------
//! ```rust
//! use mpc_toolkit::mpec::{parse, MpecType};
//!
//! let text = "M.P.E.C. 2026-C105                 Issued 2026 Feb. 13, 15:42 UT\n\n\
//!             **2026 CE3**\n\nObservations:\n";
//! let doc = parse(text, None, None, None);
//! assert_eq!(doc.mpec_id, "MPEC 2026-C105");
//! assert_eq!(doc.designation.as_deref(), Some("2026 CE3"));
//! assert_eq!(doc.date, "2026 Feb 13, 15:42 UT");
//! assert_eq!(doc.kind, MpecType::Discovery);
//! ```
pub mod arc;
pub mod classify;
pub mod client;
pub mod elements;
pub mod extract;
pub mod listing;
pub mod sections;

use serde::Serialize;
use tracing::debug;

pub use classify::{classify, classify_in_year, MpecType};
pub use client::{MpecClient, MpecDetail};
pub use elements::OrbitalElements;
pub use listing::{mpec_id_to_url, parse_recent_mpecs_html, MpecListing, MpecPage};

use crate::constants::{Day, MPC_BASE_URL};
use arc::{observation_arc, summary_arc};
use extract::{
    extract_copyright, extract_designation, extract_issue_date, extract_mpec_number,
    split_comparison, strip_copyright,
};
use sections::{split_sections, SectionKind};

/// One parsed bulletin.
///
/// Text fields are empty when the corresponding section or header line is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MpecDocument {
    /// `MPEC 2026-C105`
    pub mpec_id: String,
    /// Issue date, `2026 Feb 13, 15:42 UT`
    pub date: String,
    pub title: String,
    pub designation: Option<String>,
    #[serde(rename = "type")]
    pub kind: MpecType,
    pub header: String,
    pub observations: String,
    pub n_obs: usize,
    pub arc_days: Option<Day>,
    pub orbital_elements: OrbitalElements,
    pub orbital_elements_raw: String,
    pub residuals: String,
    pub ephemeris: String,
    /// Observer details, without the recovery comparison block
    pub observers: String,
    /// `First and last observations` block of recovery bulletins
    pub comparison: String,
    pub copyright: String,
    pub mpec_url: String,
}

/// Parse the `<pre>` text of a bulletin.
///
/// Arguments
/// ---------
/// * `raw`: the bulletin text
/// * `mpec_id`: circular identifier, read from the `M.P.E.C.` line when `None`
/// * `title`: bulletin title, used for classification and as the designation fallback
/// * `path`: MPC path of the page (`/mpec/K26/K26CA5.html`), joined to the MPC web root
///
/// Return
/// ------
/// * The parsed [`MpecDocument`].
pub fn parse(
    raw: &str,
    mpec_id: Option<&str>,
    title: Option<&str>,
    path: Option<&str>,
) -> MpecDocument {
    let title = title.unwrap_or_default().trim().to_string();
    let sections = split_sections(raw);

    let designation = extract_designation(raw).or_else(|| {
        debug!("no designation found in bulletin text, falling back to the title");
        (!title.is_empty()).then(|| title.clone())
    });

    let mut kind = classify(&title, raw);
    if kind == MpecType::Discovery
        && designation.is_some()
        && !sections.contains(SectionKind::Observations)
    {
        kind = MpecType::Recovery;
    }

    let elements_raw = sections.text(SectionKind::OrbitalElements).to_string();
    let orbital_elements = OrbitalElements::parse(&elements_raw);

    let observations = sections.text(SectionKind::Observations).to_string();
    let (mut n_obs, mut arc_days) = observation_arc(&observations);
    if n_obs == 0 {
        if let Some((count, arc)) = summary_arc(&elements_raw) {
            n_obs = count;
            arc_days = arc;
        }
    }

    let (observers, comparison) = split_comparison(sections.text(SectionKind::ObserverDetails));

    let copyright = extract_copyright(raw).unwrap_or_default();
    let mut ephemeris = sections.text(SectionKind::Ephemeris).to_string();
    if !copyright.is_empty() && !ephemeris.is_empty() {
        ephemeris = strip_copyright(&ephemeris, &copyright);
    }

    let mpec_id = match mpec_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => extract_mpec_number(raw)
            .map(|number| format!("MPEC {number}"))
            .unwrap_or_default(),
    };

    let mpec_url = path
        .filter(|p| !p.is_empty())
        .map(|p| format!("{MPC_BASE_URL}{p}"))
        .unwrap_or_default();

    MpecDocument {
        mpec_id,
        date: extract_issue_date(&sections.header).unwrap_or_default(),
        title,
        designation,
        kind,
        header: sections.header.clone(),
        observations,
        n_obs,
        arc_days,
        orbital_elements,
        orbital_elements_raw: elements_raw,
        residuals: sections.text(SectionKind::Residuals).to_string(),
        ephemeris,
        observers,
        comparison,
        copyright,
        mpec_url,
    }
}

#[cfg(test)]
mod mpec_test {
    use super::*;

    #[test]
    fn test_parse_empty_text() {
        let doc = parse("", None, None, None);
        assert_eq!(doc.kind, MpecType::Editorial);
        assert_eq!(doc.designation, None);
        assert_eq!(doc.mpec_id, "");
        assert_eq!(doc.n_obs, 0);
        assert_eq!(doc.arc_days, None);
        assert!(doc.orbital_elements.is_empty());
        assert_eq!(doc.mpec_url, "");
    }

    #[test]
    fn test_designation_falls_back_to_title() {
        let doc = parse("nothing recognizable", None, Some("2026 XX9 "), None);
        assert_eq!(doc.designation.as_deref(), Some("2026 XX9"));
        // a designation without observations is a recovery announcement
        assert_eq!(doc.kind, MpecType::Recovery);
    }

    #[test]
    fn test_daily_orbit_update() {
        let doc = parse(
            "M.P.E.C. 2026-C120\nObservations:\n",
            None,
            Some("DAILY ORBIT UPDATE"),
            Some("/mpec/K26/K26CC0.html"),
        );
        assert_eq!(doc.kind, MpecType::Editorial);
        assert_eq!(doc.mpec_id, "MPEC 2026-C120");
        assert_eq!(
            doc.mpec_url,
            "https://www.minorplanetcenter.net/mpec/K26/K26CC0.html"
        );
    }

    #[test]
    fn test_supplied_id_wins() {
        let doc = parse("M.P.E.C. 2026-C120\n", Some("MPEC 2026-C121"), None, None);
        assert_eq!(doc.mpec_id, "MPEC 2026-C121");
    }

    #[test]
    fn test_summary_fallback() {
        let text = "\
M.P.E.C. 1978-A01
**1977 QA**
Observations:
Orbital elements:
From 8 observations 1977 Aug. 21-1978 Jan. 6, mean residual 0\".71.
";
        let doc = parse(text, None, None, None);
        assert_eq!(doc.n_obs, 8);
        assert_eq!(doc.arc_days, Some(137.2));
    }
}
