//! Single-character code tables of the 80-column format and their ADES equivalents.
//!
//! Columns 15, 71 and 72 each hold one character: the observation technology, the
//! photometric band and the astrometric reference catalog. The tables below follow
//! the MPC documentation of the 80-column format and of the catalog codes.
use std::fmt;

use serde::{Deserialize, Serialize};

/// ADES observation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObsMode {
    Ccd,
    Cmo,
    Vid,
    Tdi,
    Pho,
    Enc,
    Mic,
    Pmt,
    Occ,
    Unk,
}

impl ObsMode {
    /// Direct lookup of a column-15 code. Blank and unmapped codes give `None`.
    pub fn from_code(code: char) -> Option<ObsMode> {
        use ObsMode::*;
        match code {
            'C' | 'S' | 's' | 'X' | 'x' => Some(Ccd),
            'B' => Some(Cmo),
            'V' => Some(Vid),
            'T' => Some(Tdi),
            'P' | 'A' | 'N' => Some(Pho),
            'E' => Some(Enc),
            'M' => Some(Mic),
            'e' => Some(Pmt),
            'O' => Some(Occ),
            _ => None,
        }
    }

    /// Lookup of a column-15 code falling back to [`ObsMode::Unk`].
    pub fn from_code_or_unknown(code: char) -> ObsMode {
        ObsMode::from_code(code).unwrap_or(ObsMode::Unk)
    }

    /// Column-15 code written back for this mode (`None` for [`ObsMode::Unk`]).
    pub fn to_code(self) -> Option<char> {
        use ObsMode::*;
        match self {
            Ccd => Some('C'),
            Cmo => Some('B'),
            Vid => Some('V'),
            Tdi => Some('T'),
            Pho => Some('P'),
            Enc => Some('E'),
            Mic => Some('M'),
            Pmt => Some('e'),
            Occ => Some('O'),
            Unk => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        use ObsMode::*;
        match self {
            Ccd => "CCD",
            Cmo => "CMO",
            Vid => "VID",
            Tdi => "TDI",
            Pho => "PHO",
            Enc => "ENC",
            Mic => "MIC",
            Pmt => "PMT",
            Occ => "OCC",
            Unk => "UNK",
        }
    }

    /// Parse an ADES mode string (`"CCD"`, …).
    pub fn from_ades(mode: &str) -> Option<ObsMode> {
        use ObsMode::*;
        [Ccd, Cmo, Vid, Tdi, Pho, Enc, Mic, Pmt, Occ, Unk]
            .into_iter()
            .find(|m| m.as_str() == mode.trim())
    }
}

impl fmt::Display for ObsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a column-71 band character to the ADES band code.
///
/// A blank column maps to the empty code, which callers treat as absent.
pub fn band_from_code(code: char) -> Option<&'static str> {
    let band = match code {
        'B' => "Bj",
        'V' => "Vj",
        'R' => "Rc",
        'I' => "Ic",
        'J' => "J",
        'H' => "H",
        'K' => "K",
        'U' => "Uj",
        'W' => "W",
        // Sloan u' has no ADES code of its own
        'u' | 'g' => "Sg",
        'r' => "Sr",
        'i' => "Si",
        'z' => "Sz",
        'w' => "Pw",
        'y' => "Py",
        'G' => "G",
        'T' => "Gr",
        'o' => "Ao",
        'c' => "Ac",
        'C' | 'L' => "CV",
        ' ' => "",
        _ => return None,
    };
    Some(band)
}

/// Column-72 catalog characters and their ADES `astCat` names.
pub const CATALOG_CODES: &[(char, &str)] = &[
    ('a', "USNOA1"),
    ('b', "USNOSA1"),
    ('c', "USNOA2"),
    ('d', "USNOSA2"),
    ('e', "UCAC1"),
    ('f', "Tycho1"),
    ('g', "Tycho2"),
    ('h', "GSC1.0"),
    ('i', "GSC1.1"),
    ('j', "GSC1.2"),
    ('k', "GSC2.2"),
    ('l', "ACT"),
    ('m', "GSCACT"),
    ('n', "SDSSDR8"),
    ('o', "USNOB1"),
    ('p', "PPM"),
    ('q', "UCAC4"),
    ('r', "UCAC2"),
    ('s', "USNOB2"),
    ('t', "PPMXL"),
    ('u', "UCAC3"),
    ('v', "NOMAD"),
    ('w', "CMC14"),
    ('x', "Hip2"),
    ('y', "Hip"),
    ('z', "GSC"),
    ('A', "AC"),
    ('B', "SAO1984"),
    ('C', "SAO"),
    ('D', "AGK3"),
    ('E', "FK4"),
    ('F', "ACRS"),
    ('G', "LickGas"),
    ('H', "Ida93"),
    ('I', "Perth70"),
    ('J', "COSMOS"),
    ('K', "Yale"),
    ('L', "2MASS"),
    ('M', "GSC2.3"),
    ('N', "SDSSDR7"),
    ('O', "SSTRC1"),
    ('P', "MPOSC3"),
    ('Q', "CMC15"),
    ('R', "SSTRC4"),
    ('S', "URAT1"),
    ('T', "URAT2"),
    ('U', "Gaia1"),
    ('V', "Gaia2"),
    ('W', "Gaia3"),
    ('X', "Gaia3E"),
    ('Y', "UCAC5"),
    ('Z', "ATLAS2"),
    ('0', "IHW"),
    ('1', "PS1DR1"),
    ('2', "PS1DR2"),
    ('3', "GaiaInt"),
    ('4', "GZ"),
    ('5', "UBAD"),
    ('6', "Gaia16"),
];

/// Map a column-72 catalog character to the ADES `astCat` name.
pub fn catalog_from_code(code: char) -> Option<&'static str> {
    CATALOG_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Map an ADES `astCat` name back to its column-72 character.
pub fn catalog_to_code(name: &str) -> Option<char> {
    CATALOG_CODES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(c, _)| *c)
}

#[cfg(test)]
mod codes_test {
    use super::*;

    #[test]
    fn test_mode_lookup() {
        assert_eq!(ObsMode::from_code('C'), Some(ObsMode::Ccd));
        assert_eq!(ObsMode::from_code('B'), Some(ObsMode::Cmo));
        assert_eq!(ObsMode::from_code('e'), Some(ObsMode::Pmt));
        assert_eq!(ObsMode::from_code(' '), None);
        assert_eq!(ObsMode::from_code('#'), None);
        assert_eq!(ObsMode::from_code_or_unknown('#'), ObsMode::Unk);
        assert_eq!(ObsMode::from_ades("OCC"), Some(ObsMode::Occ));
        assert_eq!(ObsMode::Ccd.to_string(), "CCD");
    }

    #[test]
    fn test_mode_code_inverse() {
        for code in ['C', 'B', 'V', 'T', 'P', 'E', 'M', 'e', 'O'] {
            let mode = ObsMode::from_code(code).unwrap();
            assert_eq!(mode.to_code(), Some(code));
        }
    }

    #[test]
    fn test_band_lookup() {
        assert_eq!(band_from_code('o'), Some("Ao"));
        assert_eq!(band_from_code('G'), Some("G"));
        assert_eq!(band_from_code(' '), Some(""));
        assert_eq!(band_from_code('Q'), None);
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(catalog_from_code('V'), Some("Gaia2"));
        assert_eq!(catalog_from_code('W'), Some("Gaia3"));
        assert_eq!(catalog_from_code('X'), Some("Gaia3E"));
        assert_eq!(catalog_from_code('L'), Some("2MASS"));
        assert_eq!(catalog_from_code('9'), None);
        assert_eq!(catalog_to_code("UCAC4"), Some('q'));
        assert_eq!(catalog_to_code("nope"), None);
    }
}
