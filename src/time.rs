use hifitime::{Epoch, Unit};
use std::str::FromStr;

use crate::{
    constants::{MAX_DAY_FRACTION_DIGITS, MJD, SECONDS_PER_DAY, WHOLE_SECOND_DAY_DIGITS},
    obs80::FormatError,
};

/// Calendar components of an 80-column date field `YYYY MM DD.ddddd`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FracDate<'a> {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    /// Fractional digits of the day, without the leading dot
    pub fraction_digits: &'a str,
}

impl FracDate<'_> {
    /// Day fraction rounded to ticks of `10^-decimals` seconds, computed on integers.
    ///
    /// `None` when the fraction has more than [`MAX_DAY_FRACTION_DIGITS`] digits.
    pub fn fraction_ticks(&self, decimals: usize) -> Option<u128> {
        let digits = self.fraction_digits.len();
        if digits > MAX_DAY_FRACTION_DIGITS {
            return None;
        }
        let numerator = u128::from_str(self.fraction_digits).ok()?;
        // ticks = numerator / 10^digits * 86400 * 10^decimals
        let divisor = 10u128.pow((digits - decimals) as u32);
        Some((numerator * SECONDS_PER_DAY + divisor / 2) / divisor)
    }
}

/// Split and validate an 80-column date field.
pub(crate) fn split_frac_date(date_str: &str) -> Option<FracDate<'_>> {
    let parts: Vec<&str> = date_str.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let year = i32::from_str(parts[0]).ok()?;
    let month = u8::from_str(parts[1]).ok()?;
    let (day, fraction_digits) = parts[2].split_once('.')?;
    let day = u8::from_str(day).ok()?;

    if fraction_digits.is_empty() || !fraction_digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    // rejects month 13, Feb 30 and friends
    Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).ok()?;

    Some(FracDate {
        year,
        month,
        day,
        fraction_digits,
    })
}

/// Number of decimals carried on the seconds for a day fraction with `digits` decimals.
pub fn seconds_decimals(digits: usize) -> usize {
    digits.saturating_sub(WHOLE_SECOND_DAY_DIGITS)
}

/// Transformation from date in the format `YYYY MM DD.ddddd` (UTC) to an ISO-8601 string
///
/// The precision of the seconds field follows the precision of the day fraction:
/// up to five decimals on the day give whole seconds, every further decimal adds one
/// decimal on the seconds. Rounding carries into minutes, hours and, for a fraction that
/// rounds up to a full day, into the next calendar day. The conversion is exact for any
/// fraction of up to [`MAX_DAY_FRACTION_DIGITS`] digits; longer fractions are rejected.
///
/// Argument
/// --------
/// * `date_str`: a string representing the date in the format `YYYY MM DD.ddddd` in the UTC frame
///
/// Return
/// ------
/// * `YYYY-MM-DDTHH:MM:SS[.f*]Z`, or [`FormatError::InvalidDate`] carrying the input text
///
/// Examples
/// --------
/// ```rust
/// use mpc_toolkit::time::decode_date;
///
/// assert_eq!(decode_date("2024 12 27.238073").unwrap(), "2024-12-27T05:42:49.5Z");
/// assert_eq!(decode_date("2026 02 07.11530").unwrap(), "2026-02-07T02:46:02Z");
/// ```
pub fn decode_date(date_str: &str) -> Result<String, FormatError> {
    let invalid = || FormatError::InvalidDate(date_str.trim().to_string());

    let date = split_frac_date(date_str).ok_or_else(invalid)?;
    let decimals = seconds_decimals(date.fraction_digits.len());

    // whole day expressed in ticks of 10^-decimals seconds
    let scale = 10u128.pow(decimals as u32);
    let ticks_per_day = SECONDS_PER_DAY * scale;
    let mut ticks = date.fraction_ticks(decimals).ok_or_else(invalid)?;

    let (mut year, mut month, mut day) = (date.year, date.month, date.day);
    if ticks >= ticks_per_day {
        ticks -= ticks_per_day;
        let next = Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0)
            .map_err(|_| invalid())?
            + Unit::Day * 1_i64;
        let (y, m, d, _, _, _, _) = next.to_gregorian_utc();
        (year, month, day) = (y, m, d);
    }

    let hours = ticks / (3600 * scale);
    let minutes = (ticks % (3600 * scale)) / (60 * scale);
    let second_ticks = ticks % (60 * scale);
    let seconds = second_ticks / scale;

    let mut iso = format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}");
    if decimals > 0 {
        let sub = second_ticks % scale;
        iso.push_str(&format!(".{sub:0width$}", width = decimals));
    }
    iso.push('Z');
    Ok(iso)
}

/// Parse an ISO-8601 UTC time as produced by [`decode_date`] into a [`hifitime::Epoch`].
///
/// Return
/// ------
/// * `None` when the string is not a valid UTC timestamp
pub fn iso_to_epoch(iso: &str) -> Option<Epoch> {
    let body = iso.trim().trim_end_matches('Z');
    Epoch::from_str(&format!("{body} UTC")).ok()
}

/// Convert an ISO-8601 UTC time to modified julian date (UTC)
pub fn iso_to_mjd(iso: &str) -> Option<MJD> {
    iso_to_epoch(iso).map(|epoch| epoch.to_mjd_utc_days())
}

/// Current calendar year in UTC, `None` if the system clock cannot be read.
pub fn current_utc_year() -> Option<i32> {
    Epoch::now().ok().map(|now| now.to_gregorian_utc().0)
}
