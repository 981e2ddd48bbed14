//! # Orbit classification
//!
//! MPC dynamical orbit classes (the `orbit_type_int` codes of the MPC orbit catalog) and
//! their inference from orbital elements.
//!
//! ## Classes
//! -----------------
//! | Code | Class           | Criteria                              |
//! |------|-----------------|---------------------------------------|
//! | 0    | Atira           | a < 1.0, Q < 0.983                    |
//! | 1    | Aten            | a < 1.0, Q ≥ 0.983                    |
//! | 2    | Apollo          | a ≥ 1.0, q < 1.017                    |
//! | 3    | Amor            | a ≥ 1.0, 1.017 ≤ q < 1.3              |
//! | 9    | Inner Other     | inner catch-all                       |
//! | 10   | Mars Crosser    | 1 ≤ a < 3.2, 1.3 < q < 1.666          |
//! | 11   | Main Belt       | 1 ≤ a < 3.27831, i < 75°              |
//! | 12   | Jupiter Trojan  | 4.8 < a < 5.4, e < 0.3                |
//! | 19   | Middle Other    | a < a_Jupiter catch-all               |
//! | 20   | Jupiter Coupled | a ≥ 1, 2 < T_J < 3                    |
//! | 21   | Neptune Trojan  | 29.8 < a < 30.4                       |
//! | 22   | Centaur         | a_Jupiter ≤ a < a_Neptune             |
//! | 23   | TNO             | a ≥ a_Neptune                         |
//! | 30   | Hyperbolic      | e > 1                                 |
//! | 31   | Parabolic       | e = 1                                 |
//! | 99   | Other           | classification failure                |
use serde::Serialize;

use crate::constants::{AstronomicalUnit, Degree};

/// Semi-major axis of Jupiter (AU)
pub const A_JUPITER: AstronomicalUnit = 5.2026;
/// Semi-major axis of Neptune (AU)
pub const A_NEPTUNE: AstronomicalUnit = 30.0690;
/// Outer edge of the main belt, the 2:1 resonance with Jupiter (AU)
pub const A_MB_OUTER: AstronomicalUnit = 3.27831;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrbitClass {
    Atira,
    Aten,
    Apollo,
    Amor,
    InnerOther,
    MarsCrosser,
    MainBelt,
    JupiterTrojan,
    MiddleOther,
    JupiterCoupled,
    NeptuneTrojan,
    Centaur,
    Tno,
    Hyperbolic,
    Parabolic,
    Other,
}

impl OrbitClass {
    pub const ALL: [OrbitClass; 16] = [
        OrbitClass::Atira,
        OrbitClass::Aten,
        OrbitClass::Apollo,
        OrbitClass::Amor,
        OrbitClass::InnerOther,
        OrbitClass::MarsCrosser,
        OrbitClass::MainBelt,
        OrbitClass::JupiterTrojan,
        OrbitClass::MiddleOther,
        OrbitClass::JupiterCoupled,
        OrbitClass::NeptuneTrojan,
        OrbitClass::Centaur,
        OrbitClass::Tno,
        OrbitClass::Hyperbolic,
        OrbitClass::Parabolic,
        OrbitClass::Other,
    ];

    /// MPC `orbit_type_int` code.
    pub fn code(self) -> u8 {
        use OrbitClass::*;
        match self {
            Atira => 0,
            Aten => 1,
            Apollo => 2,
            Amor => 3,
            InnerOther => 9,
            MarsCrosser => 10,
            MainBelt => 11,
            JupiterTrojan => 12,
            MiddleOther => 19,
            JupiterCoupled => 20,
            NeptuneTrojan => 21,
            Centaur => 22,
            Tno => 23,
            Hyperbolic => 30,
            Parabolic => 31,
            Other => 99,
        }
    }

    pub fn from_code(code: u8) -> Option<OrbitClass> {
        OrbitClass::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn short_name(self) -> &'static str {
        use OrbitClass::*;
        match self {
            Atira => "Atira",
            Aten => "Aten",
            Apollo => "Apollo",
            Amor => "Amor",
            InnerOther => "InOther",
            MarsCrosser => "Mars-X",
            MainBelt => "MB",
            JupiterTrojan => "JT",
            MiddleOther => "MidOther",
            JupiterCoupled => "JupCoup",
            NeptuneTrojan => "NepTr",
            Centaur => "Centaur",
            Tno => "TNO",
            Hyperbolic => "Hyper",
            Parabolic => "Para",
            Other => "Other",
        }
    }

    pub fn long_name(self) -> &'static str {
        use OrbitClass::*;
        match self {
            Atira => "Atira",
            Aten => "Aten",
            Apollo => "Apollo",
            Amor => "Amor",
            InnerOther => "Inner Other",
            MarsCrosser => "Mars Crosser",
            MainBelt => "Main Belt",
            JupiterTrojan => "Jupiter Trojan",
            MiddleOther => "Middle Other",
            JupiterCoupled => "Jupiter Coupled",
            NeptuneTrojan => "Neptune Trojan",
            Centaur => "Centaur",
            Tno => "TNO",
            Hyperbolic => "Hyperbolic",
            Parabolic => "Parabolic",
            Other => "Other (Unusual)",
        }
    }

    /// True for the four near-Earth classes.
    pub fn is_neo(self) -> bool {
        matches!(
            self,
            OrbitClass::Atira | OrbitClass::Aten | OrbitClass::Apollo | OrbitClass::Amor
        )
    }
}

/// Semi-major axis from perihelion distance and eccentricity; `None` unless `e < 1`.
pub fn q_e_to_a(q: AstronomicalUnit, e: f64) -> Option<AstronomicalUnit> {
    (e < 1.0).then(|| q / (1.0 - e))
}

/// Aphelion distance `Q = a(1 + e)`; `None` unless `e < 1`.
pub fn q_e_to_aphelion(q: AstronomicalUnit, e: f64) -> Option<AstronomicalUnit> {
    q_e_to_a(q, e).map(|a| a * (1.0 + e))
}

/// Orbital period in years from Kepler's third law; `None` unless `a > 0`.
pub fn a_to_period(a: AstronomicalUnit) -> Option<f64> {
    (a.is_finite() && a > 0.0).then(|| a.powf(1.5))
}

/// Tisserand parameter with respect to Jupiter.
///
/// `T_J = a_J/a + 2 cos(i) sqrt((a/a_J)(1 - e²))`; `T_J < 3` hints at a cometary origin.
///
/// Arguments
/// ---------
/// * `a`: semi-major axis (AU)
/// * `e`: eccentricity
/// * `incl`: inclination (degrees)
pub fn tisserand_jupiter(a: AstronomicalUnit, e: f64, incl: Degree) -> f64 {
    A_JUPITER / a + 2.0 * incl.to_radians().cos() * ((a / A_JUPITER) * (1.0 - e * e)).sqrt()
}

/// Infer the MPC orbit class from orbital elements.
///
/// Geometric classes are tested before the Tisserand-based Jupiter Coupled class, in this
/// order: hyperbolic/parabolic, the near-Earth classes, Mars Crosser, Main Belt, Jupiter
/// Trojan, Neptune Trojan, Jupiter Coupled, Centaur, TNO, Middle Other, Inner Other.
///
/// Arguments
/// ---------
/// * `a`: semi-major axis (AU), derived from `q / (1 - e)` when absent
/// * `e`: eccentricity
/// * `incl`: inclination (degrees), needed for Main Belt and Jupiter Coupled
/// * `q`: perihelion distance (AU)
///
/// Return
/// ------
/// * The class, or `None` when `e` or `q` is missing.
pub fn classify_from_elements(
    a: Option<AstronomicalUnit>,
    e: Option<f64>,
    incl: Option<Degree>,
    q: Option<AstronomicalUnit>,
) -> Option<OrbitClass> {
    let (e, q) = (e?, q?);

    if e > 1.0 {
        return Some(OrbitClass::Hyperbolic);
    }
    if e == 1.0 {
        return Some(OrbitClass::Parabolic);
    }

    let a = match a {
        Some(a) => a,
        None => q_e_to_a(q, e)?,
    };
    let aphelion = a * (1.0 + e);

    let class = if a < 1.0 && aphelion < 0.983 {
        OrbitClass::Atira
    } else if a < 1.0 {
        OrbitClass::Aten
    } else if q < 1.017 {
        OrbitClass::Apollo
    } else if q < 1.3 {
        OrbitClass::Amor
    } else if a < 3.2 && q > 1.3 && q < 1.666 {
        OrbitClass::MarsCrosser
    } else if a < A_MB_OUTER && incl.is_some_and(|i| i < 75.0) {
        OrbitClass::MainBelt
    } else if a > 4.8 && a < 5.4 && e < 0.3 {
        OrbitClass::JupiterTrojan
    } else if a > 29.8 && a < 30.4 {
        OrbitClass::NeptuneTrojan
    } else if incl.is_some_and(|i| {
        let tj = tisserand_jupiter(a, e, i);
        tj > 2.0 && tj < 3.0
    }) {
        OrbitClass::JupiterCoupled
    } else if (A_JUPITER..A_NEPTUNE).contains(&a) {
        OrbitClass::Centaur
    } else if a >= A_NEPTUNE {
        OrbitClass::Tno
    } else if a < A_JUPITER {
        OrbitClass::MiddleOther
    } else {
        OrbitClass::InnerOther
    };
    Some(class)
}

#[cfg(test)]
mod orbit_class_test {
    use super::*;
    use approx::assert_relative_eq;

    fn classify(a: Option<f64>, e: f64, i: Option<f64>, q: f64) -> Option<u8> {
        classify_from_elements(a, Some(e), i, Some(q)).map(OrbitClass::code)
    }

    #[test]
    fn test_codes() {
        for class in OrbitClass::ALL {
            assert_eq!(OrbitClass::from_code(class.code()), Some(class));
        }
        assert_eq!(OrbitClass::from_code(5), None);
        assert_eq!(OrbitClass::Apollo.short_name(), "Apollo");
        assert_eq!(OrbitClass::MainBelt.long_name(), "Main Belt");
        assert!(OrbitClass::Amor.is_neo());
        assert!(!OrbitClass::MarsCrosser.is_neo());
    }

    #[test]
    fn test_conversions() {
        assert_relative_eq!(q_e_to_a(1.0, 0.5).unwrap(), 2.0);
        assert_relative_eq!(q_e_to_a(2.5, 0.0).unwrap(), 2.5);
        assert_eq!(q_e_to_a(1.0, 1.0), None);
        assert_eq!(q_e_to_a(1.0, 1.5), None);
        assert_relative_eq!(q_e_to_aphelion(1.0, 0.5).unwrap(), 3.0);
        assert_eq!(q_e_to_aphelion(1.0, 1.0), None);
        assert_relative_eq!(a_to_period(4.0).unwrap(), 8.0);
        assert_relative_eq!(a_to_period(1.0).unwrap(), 1.0);
        assert_eq!(a_to_period(-1.0), None);
    }

    #[test]
    fn test_tisserand() {
        assert_relative_eq!(tisserand_jupiter(A_JUPITER, 0.0, 0.0), 3.0, epsilon = 1e-12);
        assert_relative_eq!(
            tisserand_jupiter(2.0, 0.1, 90.0),
            A_JUPITER / 2.0,
            epsilon = 1e-12
        );
        let tj = tisserand_jupiter(6.0, 0.6, 12.0);
        assert!(tj > 2.0 && tj < 3.0);
    }

    #[test]
    fn test_every_class() {
        assert_eq!(classify(Some(0.74), 0.322, Some(25.0), 0.502), Some(0));
        assert_eq!(classify(Some(0.84), 0.45, Some(10.0), 0.464), Some(1));
        assert_eq!(classify(Some(0.99), 0.01, Some(5.0), 0.9801), Some(1));
        assert_eq!(classify(Some(2.29), 0.651, Some(5.0), 0.8), Some(2));
        assert_eq!(classify(Some(1.0), 0.5, Some(10.0), 0.5), Some(2));
        assert_eq!(classify(Some(1.33), 0.1, Some(10.0), 1.2), Some(3));
        assert_eq!(classify(Some(1.5), 0.322, Some(5.0), 1.017), Some(3));
        assert_eq!(classify(Some(1.5), 0.323, Some(5.0), 1.016), Some(2));
        assert_eq!(classify(Some(2.14), 0.3, Some(20.0), 1.5), Some(10));
        assert_eq!(classify(Some(2.0), 0.35, Some(15.0), 1.301), Some(10));
        assert_eq!(classify(Some(2.7), 0.1, Some(10.0), 2.43), Some(11));
        assert_eq!(classify(Some(2.5), 0.0, Some(10.0), 2.5), Some(11));
        assert_eq!(classify(Some(5.21), 0.08, None, 4.789), Some(12));
        assert_eq!(classify(Some(3.62), 0.3, Some(10.0), 2.534), Some(19));
        assert_eq!(classify(Some(6.0), 0.6, Some(12.0), 2.4), Some(20));
        assert_eq!(classify(Some(2.7), 0.1, Some(80.0), 2.43), Some(20));
        assert_eq!(classify(Some(30.18), 0.05, Some(5.0), 28.669), Some(21));
        assert_eq!(classify(Some(16.14), 0.5, Some(20.0), 8.068), Some(22));
        assert_eq!(classify(Some(6.0), 0.6, None, 2.4), Some(22));
        assert_eq!(classify(Some(45.0), 0.1, Some(5.0), 40.5), Some(23));
        assert_eq!(classify(Some(500.0), 0.84, Some(12.0), 80.0), Some(23));
        assert_eq!(classify(None, 1.5, Some(80.0), 1.0), Some(30));
        assert_eq!(classify(None, 1.0, Some(45.0), 2.0), Some(31));
    }

    #[test]
    fn test_derived_semi_major_axis() {
        assert_eq!(classify(None, 0.1, Some(10.0), 1.2), Some(3));
        assert_eq!(classify(None, 0.651, Some(5.0), 0.8), Some(2));
        assert_eq!(classify(None, 0.1, Some(10.0), 2.43), Some(11));
    }

    #[test]
    fn test_missing_inputs() {
        assert_eq!(classify_from_elements(Some(2.0), None, Some(10.0), Some(1.5)), None);
        assert_eq!(classify_from_elements(Some(2.0), Some(0.5), Some(10.0), None), None);
        assert_eq!(classify_from_elements(None, None, None, None), None);
        assert_eq!(classify(Some(2.29), 0.651, None, 0.8), Some(2));
        assert_ne!(classify(Some(2.7), 0.1, None, 2.43), Some(11));
    }
}
