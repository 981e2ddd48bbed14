//! # ADES export
//!
//! Serialization of decoded [`ObservationRecord`]s to the IAU **ADES** exchange
//! formats, plus the reverse path and a structural validator.
//!
//! ## Overview
//!
//! - [`writer`] – XML (`<ades version="2022">` with standalone `<optical>` elements)
//!   and PSV (pipe-separated, fixed-width) builders.
//! - [`rows`] – database rows (`obs80` text + uncertainty columns) to records, with
//!   the live-NEOCP / archive designation rules.
//! - [`reader`] – ADES XML back to records.
//! - [`validate`] – structural checks mirroring `general.xsd`.
//!
//! Every builder emits only the fields present on a record, in [`OPTICAL_FIELD_ORDER`].
use std::borrow::Cow;

use crate::obs80::ObservationRecord;

pub mod reader;
pub mod rows;
pub mod validate;
pub mod writer;

pub use reader::read_ades;
pub use rows::{read_rows_csv, rows_to_records, ObsRow};
pub use validate::{validate, ValidationReport};
pub use writer::{to_psv, to_xml};

/// Order of the optical fields in `general.xsd`.
pub const OPTICAL_FIELD_ORDER: &[&str] = &[
    "permID", "provID", "trkSub", "mode", "stn", "prog", "obsTime", "rmsTime", "ra", "dec",
    "rmsRA", "rmsDec", "rmsCorr", "astCat", "mag", "band", "disc", "notes",
];

/// Columns of the PSV table and their right-justified widths.
pub const PSV_COLUMNS: &[(&str, usize)] = &[
    ("permID", 7),
    ("provID", 11),
    ("trkSub", 8),
    ("mode", 3),
    ("stn", 4),
    ("obsTime", 25),
    ("ra", 12),
    ("dec", 12),
    ("rmsRA", 7),
    ("rmsDec", 7),
    ("rmsCorr", 7),
    ("astCat", 8),
    ("mag", 6),
    ("band", 3),
    ("disc", 1),
    ("prog", 4),
    ("notes", 5),
];

/// A field value ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldValue<'a> {
    Text(Cow<'a, str>),
    /// Number printed with a fixed number of decimals
    Fixed(f64, usize),
}

impl FieldValue<'_> {
    pub(crate) fn render(&self) -> String {
        match self {
            FieldValue::Text(text) => text.to_string(),
            FieldValue::Fixed(value, decimals) => format!("{value:.decimals$}"),
        }
    }
}

/// Look up an ADES field of a record by its ADES name.
///
/// Return
/// ------
/// * `None` for absent or empty fields and for names the record does not carry.
pub(crate) fn field_value<'a>(record: &'a ObservationRecord, name: &str) -> Option<FieldValue<'a>> {
    let text = |value: &'a Option<String>| {
        value
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| FieldValue::Text(Cow::Borrowed(s)))
    };
    let fixed = |value: Option<f64>, decimals: usize| value.map(|v| FieldValue::Fixed(v, decimals));

    match name {
        "permID" => text(&record.perm_id),
        "provID" => text(&record.prov_id),
        "trkSub" => text(&record.trk_sub),
        "mode" => record.mode.map(|m| FieldValue::Text(Cow::Borrowed(m.as_str()))),
        "stn" => text(&record.stn),
        "prog" => text(&record.prog),
        "obsTime" => text(&record.obs_time),
        "rmsTime" => fixed(record.rms_time, 3),
        "ra" => fixed(record.ra, 6),
        "dec" => fixed(record.dec, 6),
        "rmsRA" => fixed(record.rms_ra, 3),
        "rmsDec" => fixed(record.rms_dec, 3),
        "rmsCorr" => fixed(record.rms_corr, 3),
        "astCat" => text(&record.ast_cat),
        "mag" => fixed(record.mag, 2),
        "band" => text(&record.band),
        "disc" => record.disc.map(|c| FieldValue::Text(Cow::Owned(c.to_string()))),
        "notes" => text(&record.notes),
        _ => None,
    }
}
