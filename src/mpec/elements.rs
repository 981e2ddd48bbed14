use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::{
    constants::{AstronomicalUnit, Degree},
    orbit_class::{classify_from_elements, OrbitClass},
};

/// Orbital elements read from the `Orbital elements:` block of a bulletin.
///
/// Every element is optional. A labelled value that is found but does not parse as a
/// number is kept verbatim in `unparsed`, keyed by the element name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrbitalElements {
    /// Osculation epoch as written, e.g. `2026 Feb. 10.0`
    pub epoch: Option<String>,
    /// Mean anomaly `M`
    #[serde(rename = "M")]
    pub mean_anomaly: Option<Degree>,
    /// Mean daily motion `n`
    #[serde(rename = "n")]
    pub mean_motion: Option<f64>,
    pub a: Option<AstronomicalUnit>,
    pub e: Option<f64>,
    pub peri: Option<Degree>,
    pub node: Option<Degree>,
    pub incl: Option<Degree>,
    /// Absolute magnitude
    #[serde(rename = "H")]
    pub h: Option<f64>,
    /// Slope parameter
    #[serde(rename = "G")]
    pub g: Option<f64>,
    pub earth_moid: Option<AstronomicalUnit>,
    /// Perihelion distance, derived as `a(1 - e)` when not written
    pub q: Option<AstronomicalUnit>,
    /// Orbital period `P` (years)
    pub period: Option<f64>,
    /// MPC uncertainty parameter
    #[serde(rename = "U")]
    pub u: Option<f64>,
    pub unparsed: BTreeMap<String, String>,
}

/// Element label, extraction rule and destination.
struct ElementRule {
    name: &'static str,
    regex: Regex,
    slot: fn(&mut OrbitalElements) -> &mut Option<f64>,
}

fn rule(
    name: &'static str,
    pattern: &str,
    slot: fn(&mut OrbitalElements) -> &mut Option<f64>,
) -> ElementRule {
    ElementRule {
        name,
        regex: Regex::new(&format!("(?m){pattern}")).expect("valid regex"),
        slot,
    }
}

static EPOCH_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Epoch\s+(.+?)\s+TT").expect("valid regex"));

// Line anchors keep single-letter labels from matching inside words such as `PHA`.
static NUMERIC_RULES: LazyLock<Vec<ElementRule>> = LazyLock::new(|| {
    vec![
        rule("M", r"^M\s+([\d.]+)", |el| &mut el.mean_anomaly),
        rule("n", r"^n\s+([\d.]+)", |el| &mut el.mean_motion),
        rule("a", r"^a\s+([\d.]+)", |el| &mut el.a),
        rule("e", r"^e\s+([\d.]+)", |el| &mut el.e),
        rule("peri", r"Peri\.\s+([\d.]+)", |el| &mut el.peri),
        rule("node", r"Node\s+([\d.]+)", |el| &mut el.node),
        rule("incl", r"Incl\.\s+([\d.]+)", |el| &mut el.incl),
        rule("H", r"\bH\s+([\d.]+)", |el| &mut el.h),
        rule("G", r"\bG\s+([\d.]+)", |el| &mut el.g),
        rule("earth_moid", r"Earth MOID\s*=\s*([\d.]+)", |el| &mut el.earth_moid),
        rule("q", r"^q\s+([\d.]+)", |el| &mut el.q),
        rule("period", r"^P\s+([\d.]+)", |el| &mut el.period),
        rule("U", r"\bU\s+(\d+)", |el| &mut el.u),
    ]
});

impl OrbitalElements {
    /// Parse the content of an `Orbital elements:` block.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use mpc_toolkit::mpec::elements::OrbitalElements;
    ///
    /// let block = "a   2.0000000   (2000.0)\ne   0.5000000   Peri.  100.0";
    /// let el = OrbitalElements::parse(block);
    /// assert_eq!(el.a, Some(2.0));
    /// assert_eq!(el.q, Some(1.0));
    /// ```
    pub fn parse(text: &str) -> OrbitalElements {
        let mut elements = OrbitalElements {
            epoch: EPOCH_RULE
                .captures(text)
                .map(|caps| caps[1].trim().to_string()),
            ..Default::default()
        };

        for rule in NUMERIC_RULES.iter() {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            let raw = &caps[1];
            match raw.parse::<f64>() {
                Ok(value) => *(rule.slot)(&mut elements) = Some(value),
                Err(_) => {
                    debug!(element = rule.name, value = raw, "orbital element is not a number");
                    elements.unparsed.insert(rule.name.to_string(), raw.to_string());
                }
            }
        }

        if elements.q.is_none() {
            if let (Some(a), Some(e)) = (elements.a, elements.e) {
                elements.q = Some(a * (1.0 - e));
            }
        }
        elements
    }

    /// True when no element was found.
    pub fn is_empty(&self) -> bool {
        *self == OrbitalElements::default()
    }

    /// MPC orbit class inferred from `a`, `e`, `incl` and `q`.
    pub fn orbit_class(&self) -> Option<OrbitClass> {
        classify_from_elements(self.a, self.e, self.incl, self.q)
    }
}
