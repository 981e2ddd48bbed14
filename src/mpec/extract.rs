//! Single-field extraction rules applied to bulletin text.
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MPEC_DESIGNATION_SCAN_LINES;

static BOLD_DESIGNATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(\d{4}\s+\w+\d*)\*\*").expect("valid regex"));
static ASTEROID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}\s+[A-Z]{1,2}\d*)$").expect("valid regex"));
static COMET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:COMET\s+)?([CPD]/\d{4}\s+\w+(?:\s+\(.*?\))?)$").expect("valid regex")
});
static INTERSTELLAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:COMET\s+)?(\d+I/\S+(?:\s+\(.*?\))?)$").expect("valid regex")
});
static ISSUED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Issued\s+(\d{4})\s+(\w+)\.?\s+(\d{1,2}),?\s*(\d{2}:\d{2})?\s*UT")
        .expect("valid regex")
});
static MPEC_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"M\.P\.E\.C\.\s+(\S+)").expect("valid regex"));
static COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^(First and last observations.*)").expect("valid regex"));

/// Designation written alone on one of the first lines of the bulletin.
///
/// Lines are stripped of blanks and `*` first. Asteroid (`2026 CE3`), comet
/// (`COMET  C/2026 A1 (MAPS)`) and interstellar (`COMET  3I/ATLAS`) forms are recognized.
pub fn designation_line(text: &str) -> Option<String> {
    text.lines()
        .take(MPEC_DESIGNATION_SCAN_LINES)
        .map(|line| line.trim().trim_matches('*').trim())
        .find_map(|line| {
            [&*ASTEROID_LINE, &*COMET_LINE, &*INTERSTELLAR_LINE]
                .into_iter()
                .find_map(|rule| rule.captures(line))
                .map(|caps| caps[1].trim().to_string())
        })
}

/// Object designation of a bulletin.
///
/// A bold `**YYYY XXn**` token anywhere in the text wins over the line scan of
/// [`designation_line`].
///
/// Examples
/// --------
/// ```rust
/// use mpc_toolkit::mpec::extract::extract_designation;
///
/// assert_eq!(extract_designation("  **2026 CE3**").as_deref(), Some("2026 CE3"));
/// assert_eq!(
///     extract_designation("COMET  C/2026 A1 (MAPS)").as_deref(),
///     Some("C/2026 A1 (MAPS)")
/// );
/// ```
pub fn extract_designation(text: &str) -> Option<String> {
    BOLD_DESIGNATION
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .or_else(|| designation_line(text))
}

/// Issue date from the bulletin header, as `YYYY Mon D` with an optional `, HH:MM UT`.
pub fn extract_issue_date(header: &str) -> Option<String> {
    let caps = ISSUED.captures(header)?;
    let month: String = caps[2].chars().take(3).collect();
    let mut date = format!("{} {} {}", &caps[1], month, &caps[3]);
    if let Some(time) = caps.get(4) {
        date.push_str(&format!(", {} UT", time.as_str()));
    }
    Some(date)
}

/// Circular number following `M.P.E.C.` in the text (`2026-C105`).
pub fn extract_mpec_number(text: &str) -> Option<String> {
    MPEC_NUMBER.captures(text).map(|caps| caps[1].to_string())
}

/// The last non-blank line of the text when it is a copyright line.
pub fn extract_copyright(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| line.contains("Copyright") || line.contains("(C)"))
        .map(str::to_string)
}

/// Remove every line containing `copyright` from `section`, then trailing blanks.
pub fn strip_copyright(section: &str, copyright: &str) -> String {
    section
        .split('\n')
        .filter(|line| !line.contains(copyright))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Split the observer details of a recovery bulletin into the details proper and the
/// trailing `First and last observations` comparison block.
///
/// Return
/// ------
/// * `(details, comparison)`; `comparison` is empty when the block is absent.
pub fn split_comparison(observer_details: &str) -> (String, String) {
    match COMPARISON.captures(observer_details).and_then(|caps| caps.get(1)) {
        Some(block) => (
            observer_details[..block.start()].trim_end().to_string(),
            block.as_str().trim().to_string(),
        ),
        None => (observer_details.to_string(), String::new()),
    }
}
