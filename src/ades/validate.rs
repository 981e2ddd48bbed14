use std::collections::HashMap;

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

/// Optical child elements accepted by the validator, in schema order.
///
/// This is [`super::OPTICAL_FIELD_ORDER`] plus the identification and photometry fields that
/// other ADES producers commonly emit.
const ACCEPTED_OPTICAL_FIELDS: &[&str] = &[
    "permID", "provID", "trkSub", "obsID", "trkID", "mode", "stn", "prog", "obsTime", "rmsTime",
    "ra", "dec", "rmsRA", "rmsDec", "rmsCorr", "astCat", "mag", "rmsMag", "band", "disc",
    "notes", "remarks",
];

const REQUIRED_OPTICAL_FIELDS: &[&str] = &["mode", "stn", "obsTime", "ra", "dec"];

/// Outcome of [`validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Number of `<optical>` elements directly under `<ades>`
    pub n_optical: usize,
    /// Number of `<obsBlock>` elements
    pub n_obs_block: usize,
    /// Problems found, capped at the requested maximum
    pub errors: Vec<String>,
    /// True when more problems were found than reported
    pub truncated: bool,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && !self.truncated
    }

    fn push(&mut self, max_errors: usize, message: String) {
        if self.errors.len() < max_errors {
            self.errors.push(message);
        } else {
            self.truncated = true;
        }
    }
}

/// Fields collected while inside one `<optical>`.
#[derive(Default)]
struct OpticalState {
    index: usize,
    last_position: Option<usize>,
    values: HashMap<String, String>,
}

impl OpticalState {
    fn check(&self, errors: &mut Vec<String>) {
        let label = format!("optical #{}", self.index);
        let has = |name: &str| self.values.contains_key(name);

        if !["permID", "provID", "trkSub"].iter().any(|f| has(*f)) {
            errors.push(format!("{label}: one of permID, provID or trkSub is required"));
        }
        for field in REQUIRED_OPTICAL_FIELDS {
            if !has(*field) {
                errors.push(format!("{label}: missing required element <{field}>"));
            }
        }

        let numeric = |name: &str| self.values.get(name).map(|v| (v, v.trim().parse::<f64>()));
        match numeric("ra") {
            Some((_, Ok(ra))) if !(0.0..360.0).contains(&ra) => {
                errors.push(format!("{label}: ra {ra} outside [0, 360)"))
            }
            Some((raw, Err(_))) => errors.push(format!("{label}: ra '{raw}' is not a number")),
            _ => {}
        }
        match numeric("dec") {
            Some((_, Ok(dec))) if !(-90.0..=90.0).contains(&dec) => {
                errors.push(format!("{label}: dec {dec} outside [-90, 90]"))
            }
            Some((raw, Err(_))) => errors.push(format!("{label}: dec '{raw}' is not a number")),
            _ => {}
        }
    }
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Walks the event stream keeping the open-element stack.
struct Validator {
    max_errors: usize,
    report: ValidationReport,
    stack: Vec<String>,
    optical: Option<OpticalState>,
    n_seen_optical: usize,
    seen_root: bool,
}

impl Validator {
    fn error(&mut self, message: String) {
        self.report.push(self.max_errors, message);
    }

    fn open(&mut self, e: &BytesStart) {
        let name = element_name(e);
        let parent = self.stack.last().cloned();

        match parent.as_deref() {
            None => {
                if self.seen_root {
                    self.error(format!("unexpected second root element <{name}>"));
                }
                self.seen_root = true;
                if name != "ades" {
                    self.error(format!("root element is <{name}>, expected <ades>"));
                } else if !matches!(e.try_get_attribute("version"), Ok(Some(_))) {
                    self.error("root element <ades> has no version attribute".to_string());
                }
            }
            Some("ades") => match name.as_str() {
                "optical" => {
                    self.report.n_optical += 1;
                    self.start_optical();
                }
                "obsBlock" => self.report.n_obs_block += 1,
                _ => self.error(format!("unknown element <{name}> in <ades>")),
            },
            Some("obsBlock") => {
                if !matches!(name.as_str(), "obsContext" | "obsData") {
                    self.error(format!("unknown element <{name}> in <obsBlock>"));
                }
            }
            Some("obsData") => {
                if name == "optical" {
                    self.start_optical();
                } else {
                    self.error(format!("unknown element <{name}> in <obsData>"));
                }
            }
            Some("optical") => self.open_field(&name),
            Some(parent) => {
                if self.stack.iter().any(|n| n == "optical") {
                    self.error(format!("unexpected element <{name}> inside <{parent}>"));
                }
                // obsContext content is free-form
            }
        }
        self.stack.push(name);
    }

    fn start_optical(&mut self) {
        self.n_seen_optical += 1;
        self.optical = Some(OpticalState {
            index: self.n_seen_optical,
            ..Default::default()
        });
    }

    fn open_field(&mut self, name: &str) {
        let Some(state) = self.optical.as_mut() else {
            return;
        };
        let label = format!("optical #{}", state.index);
        match ACCEPTED_OPTICAL_FIELDS.iter().position(|f| *f == name) {
            None => self.error(format!("{label}: unknown element <{name}>")),
            Some(position) => {
                let out_of_order = state.last_position.is_some_and(|last| position <= last);
                state.last_position = Some(position);
                state.values.entry(name.to_string()).or_default();
                if out_of_order {
                    self.error(format!("{label}: element <{name}> out of schema order"));
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let (Some(state), Some(name)) = (self.optical.as_mut(), self.stack.last()) {
            if let Some(value) = state.values.get_mut(name) {
                value.push_str(text);
            }
        }
    }

    fn close(&mut self) {
        if self.stack.pop().as_deref() == Some("optical") {
            if let Some(state) = self.optical.take() {
                let mut errors = Vec::new();
                state.check(&mut errors);
                for message in errors {
                    self.error(message);
                }
            }
        }
    }
}

/// Structural validation of an ADES XML document.
///
/// Checks well-formedness, the `<ades version="…">` root, the required fields of
/// every `<optical>` (an identifier among permID/provID/trkSub, plus mode, stn,
/// obsTime, ra and dec), unknown elements, field order and the ra/dec ranges.
/// The element content of `<obsContext>` is not checked.
///
/// Arguments
/// ---------
/// * `xml`: the document text
/// * `max_errors`: maximum number of messages kept in the report
///
/// Return
/// ------
/// * A [`ValidationReport`]; an invalid document is reported, never returned as an error.
pub fn validate(xml: &str, max_errors: usize) -> ValidationReport {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut validator = Validator {
        max_errors,
        report: ValidationReport::default(),
        stack: Vec::new(),
        optical: None,
        n_seen_optical: 0,
        seen_root: false,
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => validator.open(&e),
            Ok(Event::Empty(e)) => {
                validator.open(&e);
                validator.close();
            }
            Ok(Event::End(_)) => validator.close(),
            Ok(Event::Text(t)) => match t.unescape() {
                Ok(text) => validator.text(&text),
                Err(err) => validator.error(format!("malformed text: {err}")),
            },
            Ok(Event::CData(t)) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                validator.text(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                validator.error(format!("malformed XML: {err}"));
                break;
            }
        }
    }

    if !validator.seen_root {
        validator.error("document has no root element".to_string());
    } else if !validator.stack.is_empty() {
        let open = validator.stack.join("/");
        validator.error(format!("unclosed elements at end of document: {open}"));
    }
    validator.report
}
