use std::fmt::Display;

use itertools::Itertools;
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use super::{field_value, OPTICAL_FIELD_ORDER, PSV_COLUMNS};
use crate::{constants::ADES_VERSION, obs80::ObservationRecord, toolkit_errors::ToolkitError};

fn xml_error<E: Display>(err: E) -> ToolkitError {
    ToolkitError::AdesXml(err.to_string())
}

fn write_optical<W: std::io::Write>(
    writer: &mut Writer<W>,
    record: &ObservationRecord,
) -> Result<(), ToolkitError> {
    writer
        .write_event(Event::Start(BytesStart::new("optical")))
        .map_err(xml_error)?;

    for name in OPTICAL_FIELD_ORDER {
        let Some(value) = field_value(record, name) else {
            continue;
        };
        let text = value.render();
        writer
            .write_event(Event::Start(BytesStart::new(*name)))
            .map_err(xml_error)?;
        writer
            .write_event(Event::Text(BytesText::new(&text)))
            .map_err(xml_error)?;
        writer
            .write_event(Event::End(BytesEnd::new(*name)))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("optical")))
        .map_err(xml_error)
}

/// Build an ADES XML document with one standalone `<optical>` element per record.
///
/// Numeric fields use fixed decimals: `ra`/`dec` 6, `rms*` 3, `mag` 2.
///
/// Arguments
/// ---------
/// * `records`: the observations to serialize, in output order
/// * `pretty`: indent nested elements by two spaces
///
/// Return
/// ------
/// * The complete document, starting with the XML declaration and ending with a newline
pub fn to_xml(records: &[ObservationRecord], pretty: bool) -> Result<String, ToolkitError> {
    let mut writer = if pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;

    let root = BytesStart::new("ades").with_attributes([("version", ADES_VERSION)]);
    writer.write_event(Event::Start(root)).map_err(xml_error)?;
    for record in records {
        write_optical(&mut writer, record)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("ades")))
        .map_err(xml_error)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
    if !pretty {
        // the compact writer does not break after the declaration
        xml = xml.replacen("?><ades", "?>\n<ades", 1);
    }
    xml.push('\n');
    Ok(xml)
}

/// Build an ADES PSV document.
///
/// The output starts with `# version=2022` and a blank line, then a header row with the
/// field names and one row per record; every cell is right-justified to the column width
/// of [`PSV_COLUMNS`] and cells are joined with `|`.
pub fn to_psv(records: &[ObservationRecord]) -> String {
    let header = PSV_COLUMNS
        .iter()
        .map(|&(name, width)| format!("{name:>width$}"))
        .join("|");

    let rows = records.iter().map(|record| {
        PSV_COLUMNS
            .iter()
            .map(|&(name, width)| {
                let cell = field_value(record, name)
                    .map(|v| v.render())
                    .unwrap_or_default();
                format!("{cell:>width$}")
            })
            .join("|")
    });

    let mut psv = format!("# version={ADES_VERSION}\n\n{header}\n");
    for row in rows {
        psv.push_str(&row);
        psv.push('\n');
    }
    psv
}
