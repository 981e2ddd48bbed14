//! Observation count and arc length of a bulletin.
//!
//! Arcs use the calendar approximation `Δyear · 365.25 + Δmonth · 30.44 + Δday`
//! rather than exact calendar arithmetic, and are rounded to 0.1 day.
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{
    Day, APPROX_DAYS_PER_MONTH, APPROX_DAYS_PER_YEAR, COL_DATE, MPEC_OBSERVATION_MIN_WIDTH,
};

static OBS_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})\s+(\d{2})\s+([\d.]+)").expect("valid regex"));
static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"From\s+(\d+)\s+observations?\s+(\d{4})\s+(\w+)\.?\s+([\d.]+)(?:\s*-\s*(\d{4})\s+(\w+)\.?\s+([\d.]+))?",
    )
    .expect("valid regex")
});

/// Calendar date with a fractional day.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ApproxDate {
    year: f64,
    month: f64,
    day: f64,
}

impl ApproxDate {
    fn days_until(self, later: ApproxDate) -> Day {
        (later.year - self.year) * APPROX_DAYS_PER_YEAR
            + (later.month - self.month) * APPROX_DAYS_PER_MONTH
            + (later.day - self.day)
    }
}

fn round_tenth(days: Day) -> Day {
    (days * 10.0).round() / 10.0
}

fn month_number(name: &str) -> f64 {
    match name {
        "Jan" => 1.0,
        "Feb" => 2.0,
        "Mar" => 3.0,
        "Apr" => 4.0,
        "May" => 5.0,
        "Jun" | "June" => 6.0,
        "Jul" | "July" => 7.0,
        "Aug" => 8.0,
        "Sep" | "Sept" => 9.0,
        "Oct" => 10.0,
        "Nov" => 11.0,
        "Dec" => 12.0,
        _ => 1.0,
    }
}

/// Date of an 80-column observation line, read from columns 16–32.
fn line_date(line: &str) -> Option<ApproxDate> {
    let field: String = line
        .chars()
        .skip(COL_DATE.start)
        .take(COL_DATE.len())
        .collect();
    let caps = OBS_DATE.captures(field.trim())?;
    Some(ApproxDate {
        year: caps[1].parse().ok()?,
        month: caps[2].parse().ok()?,
        day: caps[3].parse().ok()?,
    })
}

/// Count the observation lines of an `Observations:` block and measure their arc.
///
/// Every line of at least 80 characters is an observation. The arc runs from the first
/// to the last dated line and needs at least two of them.
///
/// Return
/// ------
/// * `(n_obs, arc_days)`
pub fn observation_arc(observations: &str) -> (usize, Option<Day>) {
    let lines: Vec<&str> = observations
        .split('\n')
        .filter(|line| line.chars().count() >= MPEC_OBSERVATION_MIN_WIDTH)
        .collect();
    let dates: Vec<ApproxDate> = lines.iter().filter_map(|line| line_date(line)).collect();

    let arc = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if dates.len() >= 2 => Some(round_tenth(first.days_until(*last))),
        _ => None,
    };
    (lines.len(), arc)
}

/// Observation count and arc from the `From N observations ...` summary line of an
/// orbital-elements block.
///
/// The arc is only known when both ends carry a year
/// (`From 8 observations 1977 Aug. 21-1978 Jan. 6`).
pub fn summary_arc(elements_raw: &str) -> Option<(usize, Option<Day>)> {
    let caps = SUMMARY.captures(elements_raw)?;
    let n_obs = caps[1].parse().ok()?;

    let date = |year: usize, month: usize, day: usize| -> Option<ApproxDate> {
        Some(ApproxDate {
            year: caps.get(year)?.as_str().parse().ok()?,
            month: month_number(caps.get(month)?.as_str()),
            day: caps.get(day)?.as_str().parse().ok()?,
        })
    };
    let arc = match (date(2, 3, 4), date(5, 6, 7)) {
        (Some(first), Some(last)) => Some(round_tenth(first.days_until(last))),
        _ => None,
    };
    Some((n_obs, arc))
}
