//! # Constants and type definitions for the MPC toolkit
//!
//! This module centralizes the **fixed-width column layout** of the MPC 80-column
//! observation format, the **ADES** version tag, the **MPC endpoints** used by the
//! MPEC fetch layer, and a few type aliases shared by every other module.
//!
//! ## Overview
//!
//! - Column ranges of the 80-column record (0-based, end-exclusive)
//! - Time and calendar constants used by the date decoders
//! - Network defaults (base URL, TTLs, timeouts)
//! - Core type aliases used across the crate

use std::ops::Range;
use std::time::Duration;

// -------------------------------------------------------------------------------------------------
// MPC 80-column layout
// -------------------------------------------------------------------------------------------------

/// Width of an MPC observation record
pub const OBS80_WIDTH: usize = 80;

/// Columns 1–12: packed designation
pub const COL_DESIGNATION: Range<usize> = 0..12;
/// Column 13: discovery flag
pub const COL_DISCOVERY: usize = 12;
/// Column 14: note / program code
pub const COL_NOTE: usize = 13;
/// Column 15: observation mode code
pub const COL_MODE: usize = 14;
/// Columns 16–32: `YYYY MM DD.dddddd`
pub const COL_DATE: Range<usize> = 15..32;
/// Columns 33–44: `HH MM SS.sss`
pub const COL_RA: Range<usize> = 32..44;
/// Columns 45–56: `sDD MM SS.ss`
pub const COL_DEC: Range<usize> = 44..56;
/// Columns 66–70: magnitude
pub const COL_MAG: Range<usize> = 65..70;
/// Column 71: photometric band
pub const COL_BAND: usize = 70;
/// Column 72: astrometric catalog code
pub const COL_CATALOG: usize = 71;
/// Columns 78–80: observatory code
pub const COL_STATION: Range<usize> = 77..80;

// -------------------------------------------------------------------------------------------------
// Time constants
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a day
pub const SECONDS_PER_DAY: u128 = 86_400;

/// Day-fraction digits that map onto whole seconds; every extra digit adds one
/// decimal to the seconds field.
pub const WHOLE_SECOND_DAY_DIGITS: usize = 5;

/// Longest day fraction accepted by the date decoder. The tick count of a full day
/// at this precision still fits in a `u128`.
pub const MAX_DAY_FRACTION_DIGITS: usize = 30;

/// Mean year length used by the approximate MPEC arc computation
pub const APPROX_DAYS_PER_YEAR: f64 = 365.25;

/// Mean month length used by the approximate MPEC arc computation
pub const APPROX_DAYS_PER_MONTH: f64 = 30.44;

// -------------------------------------------------------------------------------------------------
// ADES
// -------------------------------------------------------------------------------------------------

/// ADES schema version written in the XML root and the PSV header
pub const ADES_VERSION: &str = "2022";

// -------------------------------------------------------------------------------------------------
// MPEC bulletins
// -------------------------------------------------------------------------------------------------

/// Number of leading bulletin lines searched for a standalone designation
pub const MPEC_DESIGNATION_SCAN_LINES: usize = 30;

/// Minimum line length of an observation inside an MPEC `Observations:` block
pub const MPEC_OBSERVATION_MIN_WIDTH: usize = 80;

// -------------------------------------------------------------------------------------------------
// MPC network defaults
// -------------------------------------------------------------------------------------------------

/// Minor Planet Center web root
pub const MPC_BASE_URL: &str = "https://www.minorplanetcenter.net";

/// MPC page listing the most recent circulars
pub const RECENT_MPECS_PATH: &str = "/mpec/RecentMPECs.html";

/// MPC MPEC lookup API
pub const MPC_MPEC_API_URL: &str = "https://data.minorplanetcenter.net/api/mpecs";

/// User agent sent with every request
pub const USER_AGENT: &str = "CSS-MPC-Toolkit/1.0";

/// Lifetime of the cached RecentMPECs list
pub const RECENT_LIST_TTL: Duration = Duration::from_secs(900);

/// HTTP request timeout
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Duration in days
pub type Day = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
