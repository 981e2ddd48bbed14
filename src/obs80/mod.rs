//! # MPC 80-Column Observation Decoder
//!
//! Turns one fixed-width **MPC 80-column** astrometric record into an
//! [`ObservationRecord`] whose fields carry **ADES** names and units.
//!
//! ## Overview
//! -----------------
//! This module provides:
//! - The error type [`FormatError`] raised when the date, RA or Dec columns cannot be decoded.
//! - [`decode`], the pure line decoder, and [`Uncertainties`], the externally supplied
//!   uncertainty bundle merged into the output.
//! - [`read_obs80_file`], a batch routine decoding every non-blank line of a file.
//!
//! ## Field Layout (1-indexed columns)
//! -----------------
//! * `1–12` – packed designation, unpacked through [`crate::designation`]
//! * `13` – discovery flag (`*` or `+`)
//! * `14` – note (alphabetic) or program code (digit / underscore)
//! * `15` – observation mode, see [`ObsMode`]
//! * `16–32` – date `YYYY MM DD.dddddd`
//! * `33–44` – RA `HH MM SS.sss`
//! * `45–56` – Dec `sDD MM SS.ss`
//! * `66–70` – magnitude
//! * `71` – band, `72` – catalog
//! * `78–80` – observatory code
//!
//! ## Error Handling
//! -----------------
//! Only the three load-bearing fields fail loudly. A blank date/RA/Dec column is an
//! absent field; a non-blank one that does not parse is a [`FormatError`]. Everything
//! else (unknown codes, unreadable magnitude, blank columns) is silently omitted.
//!
//! ## See also
//! ------------
//! * [`decode_date`] – fractional day → ISO-8601 with propagated precision.
//! * [`decode_ra`], [`decode_dec`] – sexagesimal → decimal degrees.
pub mod codes;

use std::ops::Range;

use camino::Utf8Path;
use hifitime::Epoch;
use thiserror::Error;

pub use codes::{band_from_code, catalog_from_code, catalog_to_code, ObsMode};

use crate::{
    constants::{
        Degree, COL_BAND, COL_CATALOG, COL_DATE, COL_DEC, COL_DESIGNATION, COL_DISCOVERY,
        COL_MAG, COL_MODE, COL_NOTE, COL_RA, COL_STATION, OBS80_WIDTH,
    },
    conversion::{decode_dec, decode_ra},
    designation::{is_numbered, unpack_lenient},
    time::{decode_date, iso_to_epoch},
    toolkit_errors::ToolkitError,
};

/// Decoding errors of the load-bearing 80-column fields.
///
/// Variants
/// -----------------
/// * `InvalidDate` – columns 16–32 are not a `YYYY MM DD.ddddd` calendar date.
/// * `InvalidRA` – columns 33–44 are not a valid `HH MM SS.sss` right ascension.
/// * `InvalidDec` – columns 45–56 are not a valid `sDD MM SS.ss` declination.
///
/// Each payload carries the offending column text, trimmed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Error parsing RA: {0}")]
    InvalidRA(String),
    #[error("Invalid Dec value: {0}")]
    InvalidDec(String),
}

/// Astrometric uncertainties supplied next to the 80-column record.
///
/// Units follow ADES: `rms_ra`/`rms_dec` in arcseconds (RA already multiplied by
/// `cos δ`), `rms_corr` unitless, `rms_time` in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Uncertainties {
    pub rms_ra: Option<f64>,
    pub rms_dec: Option<f64>,
    pub rms_corr: Option<f64>,
    pub rms_time: Option<f64>,
}

/// One decoded observation, keyed by ADES field.
///
/// A field is `None` when the corresponding columns were blank or held an
/// unmapped code. `perm_id` and `prov_id` are never both set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationRecord {
    pub perm_id: Option<String>,
    pub prov_id: Option<String>,
    pub trk_sub: Option<String>,
    pub disc: Option<char>,
    pub notes: Option<String>,
    pub prog: Option<String>,
    pub mode: Option<ObsMode>,
    pub obs_time: Option<String>,
    pub ra: Option<Degree>,
    pub dec: Option<Degree>,
    pub mag: Option<f64>,
    pub band: Option<String>,
    pub ast_cat: Option<String>,
    pub stn: Option<String>,
    pub rms_ra: Option<f64>,
    pub rms_dec: Option<f64>,
    pub rms_corr: Option<f64>,
    pub rms_time: Option<f64>,
}

impl ObservationRecord {
    /// Store an unpacked designation as `permID` when purely numeric, `provID` otherwise.
    pub fn set_designation(&mut self, designation: impl Into<String>) {
        let designation = designation.into();
        if is_numbered(&designation) {
            self.perm_id = Some(designation);
            self.prov_id = None;
        } else {
            self.prov_id = Some(designation);
            self.perm_id = None;
        }
    }

    /// Remove and return the designation, whichever kind is present.
    pub fn take_designation(&mut self) -> Option<String> {
        self.perm_id.take().or_else(|| self.prov_id.take())
    }

    /// The designation of the observed object, whichever kind is present.
    pub fn designation(&self) -> Option<&str> {
        self.perm_id.as_deref().or(self.prov_id.as_deref())
    }

    /// Merge externally supplied uncertainties, overwriting present values only.
    pub fn with_uncertainties(mut self, rms: &Uncertainties) -> Self {
        self.rms_ra = rms.rms_ra.or(self.rms_ra);
        self.rms_dec = rms.rms_dec.or(self.rms_dec);
        self.rms_corr = rms.rms_corr.or(self.rms_corr);
        self.rms_time = rms.rms_time.or(self.rms_time);
        self
    }

    /// Observation epoch (UTC) parsed from `obs_time`.
    pub fn obs_epoch(&self) -> Option<Epoch> {
        self.obs_time.as_deref().and_then(iso_to_epoch)
    }
}

/// Fixed-width view of an 80-column record, padded with blanks to the full width.
struct Columns(Vec<char>);

impl Columns {
    fn new(line: &str) -> Self {
        let mut chars: Vec<char> = line.trim_end_matches(['\r', '\n']).chars().collect();
        if chars.len() < OBS80_WIDTH {
            chars.resize(OBS80_WIDTH, ' ');
        }
        Columns(chars)
    }

    fn at(&self, col: usize) -> char {
        self.0[col]
    }

    fn slice(&self, range: Range<usize>) -> String {
        self.0[range].iter().collect()
    }

    /// Column text when it holds anything but blanks.
    fn non_blank(&self, range: Range<usize>) -> Option<String> {
        let text = self.slice(range);
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Decode a single **MPC 80-column** line into an [`ObservationRecord`].
///
/// Shorter lines are right-padded with blanks; characters past column 80 are ignored.
/// The decoder is pure: the same line and uncertainties always give the same record.
///
/// Arguments
/// -----------------
/// * `line` – A single 80-column ASCII line.
/// * `rms` – Uncertainties merged verbatim into the record; `None` members are omitted.
///
/// Return
/// ----------
/// * The decoded record, or a [`FormatError`] when the date, RA or Dec columns are
///   present but malformed.
///
/// Examples
/// ----------
/// ```rust
/// use mpc_toolkit::obs80::{decode, ObsMode, Uncertainties};
///
/// let line = "     A11guOI* C2024 12 27.23807308 56 40.968-00 16 11.93         16.54oV     W68";
/// let obs = decode(line, &Uncertainties::default()).unwrap();
/// assert_eq!(obs.disc, Some('*'));
/// assert_eq!(obs.mode, Some(ObsMode::Ccd));
/// assert_eq!(obs.ast_cat.as_deref(), Some("Gaia2"));
/// ```
pub fn decode(line: &str, rms: &Uncertainties) -> Result<ObservationRecord, FormatError> {
    let cols = Columns::new(line);
    let mut record = ObservationRecord::default();

    let packed = cols.slice(COL_DESIGNATION);
    if !packed.trim().is_empty() {
        record.set_designation(unpack_lenient(&packed));
    }

    record.disc = Some(cols.at(COL_DISCOVERY)).filter(|c| matches!(*c, '*' | '+'));

    let note = cols.at(COL_NOTE);
    if note.is_ascii_alphabetic() {
        record.notes = Some(note.to_string());
    } else if note.is_ascii_digit() || note == '_' {
        record.prog = Some(note.to_string());
    }

    record.mode = ObsMode::from_code(cols.at(COL_MODE));

    if let Some(date) = cols.non_blank(COL_DATE) {
        record.obs_time = Some(decode_date(&date)?);
    }
    if let Some(ra) = cols.non_blank(COL_RA) {
        record.ra = Some(decode_ra(&ra)?);
    }
    if let Some(dec) = cols.non_blank(COL_DEC) {
        record.dec = Some(decode_dec(&dec)?);
    }

    record.mag = cols
        .slice(COL_MAG)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|mag| mag.is_finite());

    record.band = band_from_code(cols.at(COL_BAND))
        .filter(|band| !band.is_empty())
        .map(str::to_string);
    record.ast_cat = catalog_from_code(cols.at(COL_CATALOG)).map(str::to_string);

    let stn = cols.slice(COL_STATION);
    if !stn.trim().is_empty() {
        record.stn = Some(stn.trim().to_string());
    }

    Ok(record.with_uncertainties(rms))
}

/// Decode every non-blank line of an **MPC 80-column** file.
///
/// Arguments
/// -----------------
/// * `path` – Path to the 80-column file.
///
/// Return
/// ----------
/// * All decoded records in file order, or the first I/O or [`FormatError`] encountered.
pub fn read_obs80_file(path: &Utf8Path) -> Result<Vec<ObservationRecord>, ToolkitError> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| decode(line, &Uncertainties::default()).map_err(ToolkitError::from))
        .collect()
}

#[cfg(test)]
mod obs80_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const YR4_LINE: &str =
        "     A11guOI* C2024 12 27.23807308 56 40.968-00 16 11.93         16.54oV     W68";

    #[test]
    fn test_decode_full_line() {
        let rms = Uncertainties {
            rms_ra: Some(0.197),
            rms_dec: Some(0.161),
            rms_corr: Some(-0.596),
            rms_time: None,
        };
        let obs = decode(YR4_LINE, &rms).unwrap();

        assert_eq!(obs.prov_id.as_deref(), Some("A11guOI"));
        assert_eq!(obs.perm_id, None);
        assert_eq!(obs.disc, Some('*'));
        assert_eq!(obs.notes, None);
        assert_eq!(obs.mode, Some(ObsMode::Ccd));
        assert_eq!(obs.obs_time.as_deref(), Some("2024-12-27T05:42:49.5Z"));
        assert_abs_diff_eq!(obs.ra.unwrap(), 134.1707, epsilon = 1e-4);
        assert_abs_diff_eq!(obs.dec.unwrap(), -0.26998, epsilon = 1e-4);
        assert_eq!(obs.mag, Some(16.54));
        assert_eq!(obs.band.as_deref(), Some("Ao"));
        assert_eq!(obs.ast_cat.as_deref(), Some("Gaia2"));
        assert_eq!(obs.stn.as_deref(), Some("W68"));
        assert_eq!(obs.rms_ra, Some(0.197));
        assert_eq!(obs.rms_corr, Some(-0.596));
        assert_eq!(obs.rms_time, None);
    }

    #[test]
    fn test_decode_numbered_with_note() {
        let line =
            "00433         C2025 01 15.12345 10 12 13.45 +05 06 07.8          12.3 V      I41";
        let obs = decode(line, &Uncertainties::default()).unwrap();
        assert_eq!(obs.perm_id.as_deref(), Some("433"));
        assert_eq!(obs.prov_id, None);
        assert_eq!(obs.disc, None);
        assert_eq!(obs.band.as_deref(), Some("Vj"));
        assert_eq!(obs.ast_cat, None);
        assert_eq!(obs.stn.as_deref(), Some("I41"));

        let noted = format!("{}K{}", &line[..13], &line[14..]);
        let obs = decode(&noted, &Uncertainties::default()).unwrap();
        assert_eq!(obs.notes.as_deref(), Some("K"));
        assert_eq!(obs.prog, None);

        let programmed = format!("{}0{}", &line[..13], &line[14..]);
        let obs = decode(&programmed, &Uncertainties::default()).unwrap();
        assert_eq!(obs.prog.as_deref(), Some("0"));
        assert_eq!(obs.notes, None);
    }

    #[test]
    fn test_decode_short_line_is_padded() {
        let obs = decode("     K24Y04R  C2024 12 27.238073", &Uncertainties::default()).unwrap();
        assert_eq!(obs.prov_id.as_deref(), Some("2024 YR4"));
        assert_eq!(obs.obs_time.as_deref(), Some("2024-12-27T05:42:49.5Z"));
        assert_eq!(obs.ra, None);
        assert_eq!(obs.dec, None);
        assert_eq!(obs.stn, None);
        assert_eq!(obs.mag, None);
    }

    #[test]
    fn test_decode_blank_line() {
        let obs = decode("", &Uncertainties::default()).unwrap();
        assert_eq!(obs, ObservationRecord::default());
    }

    #[test]
    fn test_decode_soft_omissions() {
        // unreadable magnitude, unknown mode, band and catalog codes
        let line =
            "     K09R05F  #2009 09 15.23433 22 52 22.62 -14 47 03.2          2x.8 Q9     G96";
        let obs = decode(line, &Uncertainties::default()).unwrap();
        assert_eq!(obs.mode, None);
        assert_eq!(obs.mag, None);
        assert_eq!(obs.band, None);
        assert_eq!(obs.ast_cat, None);
        assert_eq!(obs.prov_id.as_deref(), Some("2009 RF5"));
    }

    #[test]
    fn test_decode_invalid_fields() {
        let line =
            "     K09R05F  C20xx 09 15.23433 22 52 22.62 -14 47 03.2          20.8 Vr~097wG96";
        assert!(matches!(
            decode(line, &Uncertainties::default()),
            Err(FormatError::InvalidDate(_))
        ));

        let line =
            "     K09R05F  C2009 09 15.23433 XX YY ZZ.ZZ -AA BB CC.C          20.8 Vr~097wG96";
        assert!(matches!(
            decode(line, &Uncertainties::default()),
            Err(FormatError::InvalidRA(_))
        ));

        let line =
            "     K09R05F  C2009 09 15.23433 22 52 22.62 -AA BB CC.C          20.8 Vr~097wG96";
        assert!(matches!(
            decode(line, &Uncertainties::default()),
            Err(FormatError::InvalidDec(_))
        ));
    }

    #[test]
    fn test_designation_exclusivity() {
        let mut obs = ObservationRecord::default();
        obs.set_designation("2024 YR4");
        obs.set_designation("433");
        assert_eq!(obs.perm_id.as_deref(), Some("433"));
        assert_eq!(obs.prov_id, None);
        assert_eq!(obs.designation(), Some("433"));
        assert_eq!(obs.take_designation().as_deref(), Some("433"));
        assert_eq!(obs.designation(), None);
    }

    #[test]
    fn test_obs_epoch() {
        let obs = decode(YR4_LINE, &Uncertainties::default()).unwrap();
        let mjd = obs.obs_epoch().unwrap().to_mjd_utc_days();
        assert_abs_diff_eq!(mjd, 60671.238073, epsilon = 1e-5);
    }

    #[test]
    fn test_non_finite_magnitude_is_blank() {
        let band = decode(YR4_LINE, &Uncertainties::default()).unwrap().band;
        for mag in ["  NaN", "  inf", " -inf", "  nan"] {
            let line = format!("{}{mag}{}", &YR4_LINE[..65], &YR4_LINE[70..]);
            let obs = decode(&line, &Uncertainties::default()).unwrap();
            assert_eq!(obs.mag, None, "{mag:?}");
            assert_eq!(obs.band, band);
        }
    }
}
