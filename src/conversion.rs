use crate::{constants::Degree, obs80::FormatError};

/// Output decimals used when the seconds field carries no decimal point.
const DEFAULT_ANGLE_DECIMALS: usize = 4;

/// Extra decimals kept on the degree value relative to the seconds field.
const ANGLE_EXTRA_DECIMALS: usize = 2;

/// Count the digits after the decimal point of a numeric field.
///
/// Arguments
/// ---------------
/// * `field`: a string slice containing the numeric value (e.g., `"56.78"`)
///
/// Return
/// ----------
/// * `Some(n)` with the number of fractional digits, or `None` when the field has no decimal point
pub(crate) fn fraction_digits(field: &str) -> Option<usize> {
    field
        .trim()
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
}

/// Number of decimals emitted on a degree value decoded from a sexagesimal seconds field.
fn angle_decimals(seconds: &str) -> usize {
    match fraction_digits(seconds) {
        Some(digits) => digits + ANGLE_EXTRA_DECIMALS,
        None => DEFAULT_ANGLE_DECIMALS,
    }
}

/// Round `value` half away from zero to `decimals` decimal places.
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Split a sexagesimal field into its three integer/integer/float components.
fn split_sexagesimal(field: &str) -> Option<(u32, u32, &str, f64)> {
    let parts: Vec<&str> = field.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let major: u32 = parts[0].parse().ok()?;
    let minutes: u32 = parts[1].parse().ok()?;
    let s_raw = parts[2];
    let seconds: f64 = s_raw.parse().ok()?;
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    Some((major, minutes, s_raw, seconds))
}

/// Decode a right ascension field to decimal degrees.
///
/// The output keeps two more decimals than the seconds field (four when the seconds have no
/// decimal point) and is wrapped into `[0, 360)`.
///
/// Arguments
/// ---------
/// * `ra`: a string representing the right ascension in the format `HH MM SS.sss`
///
/// Returns
/// -------
/// * The right ascension in degrees, or [`FormatError::InvalidRA`] carrying the input text.
///
/// Examples
/// --------
/// ```rust
/// use mpc_toolkit::conversion::decode_ra;
///
/// let ra = decode_ra("08 56 40.968").unwrap();
/// assert!((ra - 134.17070).abs() < 1e-5);
/// ```
pub fn decode_ra(ra: &str) -> Result<Degree, FormatError> {
    let invalid = || FormatError::InvalidRA(ra.trim().to_string());

    let (h, m, s_raw, s) = split_sexagesimal(ra.trim()).ok_or_else(invalid)?;
    if h >= 24 {
        return Err(invalid());
    }

    let ra_deg = (h as f64 + m as f64 / 60.0 + s / 3600.0) * 15.0;
    let rounded = round_to(ra_deg, angle_decimals(s_raw));
    Ok(if rounded >= 360.0 { rounded - 360.0 } else { rounded })
}

/// Decode a declination field to decimal degrees.
///
/// The sign is read from an explicit leading `+`/`-`; a missing sign means north.
/// Precision follows the same rule as [`decode_ra`].
///
/// Arguments
/// ---------
/// * `dec`: a string representing the declination in the format `sDD MM SS.ss`
///
/// Returns
/// -------
/// * The declination in degrees within `[-90, 90]`, or [`FormatError::InvalidDec`].
pub fn decode_dec(dec: &str) -> Result<Degree, FormatError> {
    let invalid = || FormatError::InvalidDec(dec.trim().to_string());

    let trimmed = dec.trim();
    let sign = if trimmed.starts_with('-') { -1.0 } else { 1.0 };
    let unsigned = trimmed.trim_start_matches(['+', '-']);

    let (d, m, s_raw, s) = split_sexagesimal(unsigned).ok_or_else(invalid)?;

    let magnitude = d as f64 + m as f64 / 60.0 + s / 3600.0;
    if magnitude > 90.0 {
        return Err(invalid());
    }

    Ok(round_to(sign * magnitude, angle_decimals(s_raw)))
}
