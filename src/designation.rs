//! # MPC packed designations
//!
//! Bidirectional conversion between human-readable minor-planet designations
//! (`"2024 YR4"`, `"433"`, `"780896"`) and the compact packed form used in the
//! first twelve columns of an 80-column observation record.
//!
//! ## Packed forms
//!
//! | Kind                 | Unpacked    | Packed    |
//! |----------------------|-------------|-----------|
//! | Numbered ≤ 99 999    | `433`       | `00433`   |
//! | Numbered ≤ 619 999   | `100001`    | `A0001`   |
//! | Numbered ≥ 620 000   | `620000`    | `~0000`   |
//! | Provisional          | `2024 YR4`  | `K24Y04R` |
//!
//! Numbers and cycle counts above the two-digit range use the base-62 alphabet
//! `0-9A-Za-z`. The century letter is `I`, `J` or `K` for the 1800s, 1900s and 2000s.
use thiserror::Error;

const BASE62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// First number written with the tilde-prefixed extended form
pub const EXTENDED_NUMBER_START: u64 = 620_000;

/// Largest number the extended form can hold
pub const EXTENDED_NUMBER_MAX: u64 = EXTENDED_NUMBER_START + 62u64.pow(4) - 1;

/// Errors raised by [`pack`] and [`unpack`].
#[derive(Error, Debug, PartialEq)]
pub enum DesignationError {
    #[error("Unrecognized designation: {0:?}")]
    Unrecognized(String),
    #[error("Number out of packable range: {0}")]
    OutOfRange(u64),
}

fn base62_value(c: char) -> Option<u32> {
    BASE62.iter().position(|&b| b as char == c).map(|v| v as u32)
}

fn base62_char(value: u32) -> Option<char> {
    BASE62.get(value as usize).map(|&b| b as char)
}

fn century_prefix(century: &str) -> Option<char> {
    match century {
        "18" => Some('I'),
        "19" => Some('J'),
        "20" => Some('K'),
        _ => None,
    }
}

fn century_digits(prefix: char) -> Option<&'static str> {
    match prefix {
        'I' => Some("18"),
        'J' => Some("19"),
        'K' => Some("20"),
        _ => None,
    }
}

/// Decode the two-character cycle count of a packed provisional designation.
///
/// `00`–`99` are literal, then the first character switches to base-62 tens:
/// `A0` = 100, …, `z9` = 619.
pub fn decode_cycle(packed: &str) -> Option<u32> {
    let mut chars = packed.chars();
    let (high, low) = (chars.next()?, chars.next()?);
    if chars.next().is_some() {
        return None;
    }
    let low = low.to_digit(10)?;
    Some(base62_value(high)? * 10 + low)
}

/// Encode a cycle count on two characters, the inverse of [`decode_cycle`].
pub fn encode_cycle(cycle: u32) -> Option<String> {
    if cycle < 100 {
        return Some(format!("{cycle:02}"));
    }
    let high = base62_char(cycle / 10)?;
    Some(format!("{high}{}", cycle % 10))
}

fn unpack_number(packed: &str) -> Option<u64> {
    if let Some(extended) = packed.strip_prefix('~') {
        if extended.chars().count() != 4 {
            return None;
        }
        let value = extended
            .chars()
            .try_fold(0u64, |acc, c| Some(acc * 62 + base62_value(c)? as u64))?;
        return Some(EXTENDED_NUMBER_START + value);
    }

    if packed.len() != 5 || !packed.is_ascii() {
        return None;
    }
    let (head, tail) = packed.split_at(1);
    if !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let head = head.chars().next()?;
    let high = if head.is_ascii_digit() {
        head.to_digit(10)?
    } else if head.is_ascii_alphabetic() {
        base62_value(head)?
    } else {
        return None;
    };
    let number = high as u64 * 10_000 + tail.parse::<u64>().ok()?;
    (number > 0).then_some(number)
}

fn unpack_provisional(packed: &str) -> Option<String> {
    if packed.len() != 7 || !packed.is_ascii() {
        return None;
    }
    let century = century_digits(packed.chars().next()?)?;
    let year = &packed[1..3];
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let half_month = packed[3..4].chars().next()?;
    let order = packed[6..7].chars().next()?;
    if !half_month.is_ascii_uppercase() || !order.is_ascii_uppercase() {
        return None;
    }
    let cycle = decode_cycle(&packed[4..6])?;

    Some(if cycle == 0 {
        format!("{century}{year} {half_month}{order}")
    } else {
        format!("{century}{year} {half_month}{order}{cycle}")
    })
}

/// Unpack an MPC packed designation to its human-readable form.
///
/// Arguments
/// ---------
/// * `packed`: packed designation, surrounding blanks are ignored (e.g. `"K24Y04R"`, `"00433  "`)
///
/// Return
/// ------
/// * The unpacked designation (`"2024 YR4"`, `"433"`), or [`DesignationError::Unrecognized`]
///
/// Examples
/// --------
/// ```rust
/// use mpc_toolkit::designation::unpack;
///
/// assert_eq!(unpack("K20C03D").unwrap(), "2020 CD3");
/// assert_eq!(unpack("~0000").unwrap(), "620000");
/// ```
pub fn unpack(packed: &str) -> Result<String, DesignationError> {
    let s = packed.trim();
    if let Some(number) = unpack_number(s) {
        return Ok(number.to_string());
    }
    unpack_provisional(s).ok_or_else(|| DesignationError::Unrecognized(s.to_string()))
}

/// Unpack a designation, returning the trimmed input unchanged when it is not a packed form.
///
/// Temporary NEOCP designations (e.g. `A11guOI`) and other free-form identifiers
/// travel through this path untouched.
pub fn unpack_lenient(packed: &str) -> String {
    unpack(packed).unwrap_or_else(|_| packed.trim().to_string())
}

/// Pack a human-readable designation into its MPC packed form.
///
/// Arguments
/// ---------
/// * `unpacked`: a number (`"433"`, `"780896"`) or a provisional designation (`"2024 YR4"`)
///
/// Return
/// ------
/// * The packed designation without trailing padding (`"00433"`, `"~3aq8"`, `"K24Y04R"`)
pub fn pack(unpacked: &str) -> Result<String, DesignationError> {
    let s = unpacked.trim();
    let unrecognized = || DesignationError::Unrecognized(s.to_string());

    if is_numbered(s) {
        let number: u64 = s.parse().map_err(|_| unrecognized())?;
        return pack_number(number);
    }

    let (year, body) = s.split_once(' ').ok_or_else(unrecognized)?;
    let body = body.trim_start();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unrecognized());
    }
    let prefix = century_prefix(&year[..2]).ok_or_else(unrecognized)?;

    let mut letters = body.chars();
    let half_month = letters.next().filter(char::is_ascii_uppercase);
    let order = letters.next().filter(char::is_ascii_uppercase);
    let (Some(half_month), Some(order)) = (half_month, order) else {
        return Err(unrecognized());
    };
    let cycle_str = letters.as_str();
    let cycle = if cycle_str.is_empty() {
        0
    } else if cycle_str.bytes().all(|b| b.is_ascii_digit()) {
        cycle_str.parse::<u32>().map_err(|_| unrecognized())?
    } else {
        return Err(unrecognized());
    };
    let cycle = encode_cycle(cycle).ok_or_else(unrecognized)?;

    Ok(format!("{prefix}{}{half_month}{cycle}{order}", &year[2..]))
}

fn pack_number(number: u64) -> Result<String, DesignationError> {
    match number {
        0 => Err(DesignationError::OutOfRange(number)),
        1..=99_999 => Ok(format!("{number:05}")),
        100_000..=619_999 => {
            let high = base62_char((number / 10_000) as u32)
                .ok_or(DesignationError::OutOfRange(number))?;
            Ok(format!("{high}{:04}", number % 10_000))
        }
        EXTENDED_NUMBER_START..=EXTENDED_NUMBER_MAX => {
            let mut value = number - EXTENDED_NUMBER_START;
            let mut digits = ['0'; 4];
            for slot in digits.iter_mut().rev() {
                *slot = BASE62[(value % 62) as usize] as char;
                value /= 62;
            }
            Ok(format!("~{}", digits.iter().collect::<String>()))
        }
        _ => Err(DesignationError::OutOfRange(number)),
    }
}

/// True for permanent (purely numeric) designations.
pub fn is_numbered(designation: &str) -> bool {
    !designation.is_empty() && designation.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod designation_test {
    use super::*;

    #[test]
    fn test_unpack_provisional() {
        assert_eq!(unpack("K24Y04R").unwrap(), "2024 YR4");
        assert_eq!(unpack("J95X00A").unwrap(), "1995 XA");
        assert_eq!(unpack("K20C03D").unwrap(), "2020 CD3");
        assert_eq!(unpack("K07Tf8A").unwrap(), "2007 TA418");
        assert_eq!(unpack("I99A00A").unwrap(), "1899 AA");
    }

    #[test]
    fn test_unpack_numbered() {
        assert_eq!(unpack("00433  ").unwrap(), "433");
        assert_eq!(unpack("A0001").unwrap(), "100001");
        assert_eq!(unpack("a0001").unwrap(), "360001");
        assert_eq!(unpack("z9999").unwrap(), "619999");
        assert_eq!(unpack("~0000").unwrap(), "620000");
        assert_eq!(unpack("~000z").unwrap(), "620061");
    }

    #[test]
    fn test_unpack_unrecognized() {
        assert_eq!(
            unpack("A11guOI"),
            Err(DesignationError::Unrecognized("A11guOI".into()))
        );
        assert!(unpack("").is_err());
        assert!(unpack("00000").is_err());
        assert!(unpack("~00").is_err());
        assert_eq!(unpack_lenient("  A11guOI "), "A11guOI");
        assert_eq!(unpack_lenient("K24Y04R"), "2024 YR4");
    }

    #[test]
    fn test_pack() {
        assert_eq!(pack("2024 YR4").unwrap(), "K24Y04R");
        assert_eq!(pack("433").unwrap(), "00433");
        assert_eq!(pack("1995 XA").unwrap(), "J95X00A");
        assert_eq!(pack("2020 CD3").unwrap(), "K20C03D");
        assert_eq!(pack("2007 TA418").unwrap(), "K07Tf8A");
        assert_eq!(pack("100001").unwrap(), "A0001");
        assert_eq!(pack("620000").unwrap(), "~0000");
        assert_eq!(pack("2024 yr4"), Err(DesignationError::Unrecognized("2024 yr4".into())));
        assert_eq!(pack("2024 YR4000"), Err(DesignationError::Unrecognized("2024 YR4000".into())));
        assert_eq!(
            pack(&(EXTENDED_NUMBER_MAX + 1).to_string()),
            Err(DesignationError::OutOfRange(EXTENDED_NUMBER_MAX + 1))
        );
    }

    #[test]
    fn test_pack_unpack_inverse() {
        let designations = [
            "1", "433", "99999", "100000", "360001", "619999", "620000", "780896",
            "15396335", "1995 XA", "2024 YR4", "2020 CD3", "1850 AB12", "2099 ZZ619",
        ];
        for d in designations {
            let packed = pack(d).unwrap();
            assert_eq!(unpack(&packed).unwrap(), d, "packed form {packed}");
        }
    }

    #[test]
    fn test_cycle_codec() {
        assert_eq!(decode_cycle("04"), Some(4));
        assert_eq!(decode_cycle("A0"), Some(100));
        assert_eq!(decode_cycle("z9"), Some(619));
        assert_eq!(decode_cycle("A"), None);
        assert_eq!(encode_cycle(105).as_deref(), Some("A5"));
        assert_eq!(encode_cycle(620), None);
    }
}
