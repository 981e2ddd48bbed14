use camino::Utf8Path;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    obs80::{decode, ObservationRecord, Uncertainties},
    toolkit_errors::ToolkitError,
};

/// One observation row as supplied by the database collaborator.
///
/// # Fields
///
/// * `obs80` - the 80-column record
/// * `trkid` - MPC tracklet identifier
/// * `rmsra`, `rmsdec`, `rmscorr`, `rmstime` - uncertainty columns, merged verbatim
/// * `iau_desig` - resolved IAU designation, only set for rows coming from the archive
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObsRow {
    pub obs80: String,
    #[serde(default)]
    pub trkid: Option<String>,
    #[serde(default)]
    pub rmsra: Option<f64>,
    #[serde(default)]
    pub rmsdec: Option<f64>,
    #[serde(default)]
    pub rmscorr: Option<f64>,
    #[serde(default)]
    pub rmstime: Option<f64>,
    #[serde(default)]
    pub iau_desig: Option<String>,
}

impl ObsRow {
    pub fn uncertainties(&self) -> Uncertainties {
        Uncertainties {
            rms_ra: self.rmsra,
            rms_dec: self.rmsdec,
            rms_corr: self.rmscorr,
            rms_time: self.rmstime,
        }
    }

    fn resolved_designation(&self) -> Option<&str> {
        self.iau_desig
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Convert database rows to ADES-ready records.
///
/// Two designation rules apply:
/// * archive rows (with `iau_desig`) take the resolved designation as `permID`/`provID`
///   and use `trkid` as `trkSub`;
/// * live NEOCP rows keep their temporary designation, which is not a provisional
///   designation, in `trkSub`.
///
/// Rows whose `obs80` text cannot be decoded are skipped and logged.
pub fn rows_to_records(rows: &[ObsRow]) -> Vec<ObservationRecord> {
    rows.iter()
        .filter_map(|row| {
            let mut record = match decode(&row.obs80, &row.uncertainties()) {
                Ok(record) => record,
                Err(err) => {
                    warn!(obs80 = %row.obs80.trim_end(), "skipping undecodable row: {err}");
                    return None;
                }
            };

            match row.resolved_designation() {
                Some(iau) => {
                    record.set_designation(iau);
                    record.trk_sub = row
                        .trkid
                        .as_deref()
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string);
                }
                None => {
                    if let Some(temporary) = record.prov_id.take() {
                        record.trk_sub = Some(temporary);
                    }
                }
            }
            Some(record)
        })
        .collect()
}

/// Read observation rows from a CSV export with a header line naming the [`ObsRow`] columns.
pub fn read_rows_csv(path: &Utf8Path) -> Result<Vec<ObsRow>, ToolkitError> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<ObsRow>, csv::Error>>()?;
    debug!(path = %path, rows = rows.len(), "read observation rows");
    Ok(rows)
}
