use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::time::current_utc_year;

/// Kind of bulletin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MpecType {
    Discovery,
    Recovery,
    /// Daily orbit updates and editorials, filtered from listings downstream
    Editorial,
}

impl MpecType {
    pub fn as_str(self) -> &'static str {
        match self {
            MpecType::Discovery => "discovery",
            MpecType::Recovery => "recovery",
            MpecType::Editorial => "editorial",
        }
    }
}

impl fmt::Display for MpecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

static COMET_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[CPD]/)(\d{4})\s+\w").expect("valid regex"));
static PROVISIONAL_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\s+[A-Z]{1,2}\d*\b").expect("valid regex"));

/// Year of the designation named in a title, comet form first.
fn designation_year(title: &str) -> Option<i32> {
    COMET_YEAR
        .captures(title)
        .or_else(|| PROVISIONAL_YEAR.captures(title))
        .and_then(|caps| caps[1].parse().ok())
}

/// Classify a bulletin against the current UTC year. See [`classify_in_year`].
pub fn classify(title: &str, body: &str) -> MpecType {
    classify_in_year(title, body, current_utc_year())
}

/// Classify a bulletin from its title and `<pre>` body.
///
/// The rules apply in order:
/// 1. a title naming a `DAILY ORBIT UPDATE` or an `EDITORIAL` gives [`MpecType::Editorial`];
/// 2. a body mentioning `Revision to MPEC` or `Additional Observations` gives
///    [`MpecType::Recovery`];
/// 3. any other non-empty body gives [`MpecType::Discovery`];
/// 4. without a body, an empty title gives [`MpecType::Editorial`], a title whose
///    designation year is earlier than `current_year` gives [`MpecType::Recovery`], and
///    anything else gives [`MpecType::Discovery`].
///
/// Arguments
/// ---------
/// * `title`: the bulletin title, e.g. `2026 CE3`
/// * `body`: the bulletin text, empty when only the title is known
/// * `current_year`: reference year of the designation heuristic
pub fn classify_in_year(title: &str, body: &str, current_year: Option<i32>) -> MpecType {
    let upper = title.to_uppercase();
    if upper.contains("DAILY ORBIT UPDATE") || upper.contains("EDITORIAL") {
        return MpecType::Editorial;
    }

    if body.contains("Revision to MPEC") || body.contains("Additional Observations") {
        return MpecType::Recovery;
    }
    if !body.trim().is_empty() {
        return MpecType::Discovery;
    }

    if title.trim().is_empty() {
        return MpecType::Editorial;
    }
    match (designation_year(title), current_year) {
        (Some(year), Some(current)) if year < current => MpecType::Recovery,
        _ => MpecType::Discovery,
    }
}

#[cfg(test)]
mod classify_test {
    use super::*;

    #[test]
    fn test_editorial_titles() {
        assert_eq!(
            classify("DAILY ORBIT UPDATE", "Observations:\n..."),
            MpecType::Editorial
        );
        assert_eq!(classify("Editorial Notice", ""), MpecType::Editorial);
    }

    #[test]
    fn test_body_rules() {
        assert_eq!(
            classify_in_year("2026 CE3", "Revision to MPEC 2026-C100", Some(2026)),
            MpecType::Recovery
        );
        assert_eq!(
            classify_in_year("", "Additional Observations:\n", Some(2026)),
            MpecType::Recovery
        );
        assert_eq!(
            classify_in_year("2019 AB", "Observations:\n", Some(2026)),
            MpecType::Discovery
        );
    }

    #[test]
    fn test_title_only_heuristic() {
        assert_eq!(classify_in_year("", "", Some(2026)), MpecType::Editorial);
        assert_eq!(classify_in_year("   ", "  \n", Some(2026)), MpecType::Editorial);
        assert_eq!(classify_in_year("2026 CE3", "", Some(2026)), MpecType::Discovery);
        assert_eq!(classify_in_year("2024 YR4", "", Some(2026)), MpecType::Recovery);
        assert_eq!(
            classify_in_year("COMET C/2025 A1 (MAPS)", "", Some(2026)),
            MpecType::Recovery
        );
        assert_eq!(classify_in_year("COMET 3I/ATLAS", "", Some(2026)), MpecType::Discovery);
        assert_eq!(classify_in_year("2024 YR4", "", None), MpecType::Discovery);
    }

    #[test]
    fn test_display() {
        assert_eq!(MpecType::Recovery.to_string(), "recovery");
    }
}
