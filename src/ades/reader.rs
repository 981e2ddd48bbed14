use quick_xml::de::from_str;
use serde::Deserialize;

use crate::{
    obs80::{ObsMode, ObservationRecord},
    toolkit_errors::ToolkitError,
};

#[derive(Debug, Deserialize)]
pub struct Ades {
    #[serde(rename = "@version")]
    pub version: Option<String>,

    #[serde(rename = "obsBlock", default)]
    pub obs_blocks: Vec<ObsBlock>,

    #[serde(rename = "optical", default)]
    pub flat_opticals: Vec<OpticalObs>,
}

#[derive(Debug, Deserialize)]
pub struct ObsBlock {
    #[serde(rename = "obsContext")]
    pub obs_context: Option<ObsContext>,

    #[serde(rename = "obsData")]
    pub obs_data: ObsData,
}

#[derive(Debug, Deserialize)]
pub struct ObsContext {
    pub observatory: Option<Observatory>,
}

#[derive(Debug, Deserialize)]
pub struct Observatory {
    #[serde(rename = "mpcCode")]
    pub mpc_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ObsData {
    #[serde(rename = "optical", default)]
    pub opticals: Vec<OpticalObs>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpticalObs {
    #[serde(rename = "permID")]
    pub perm_id: Option<String>,
    #[serde(rename = "provID")]
    pub prov_id: Option<String>,
    #[serde(rename = "trkSub")]
    pub trk_sub: Option<String>,
    pub mode: Option<String>,
    pub stn: Option<String>,
    pub prog: Option<String>,
    #[serde(rename = "obsTime")]
    pub obs_time: Option<String>,
    #[serde(rename = "rmsTime")]
    pub rms_time: Option<f64>,
    pub ra: Option<f64>,
    pub dec: Option<f64>,
    #[serde(rename = "rmsRA")]
    pub rms_ra: Option<f64>,
    #[serde(rename = "rmsDec")]
    pub rms_dec: Option<f64>,
    #[serde(rename = "rmsCorr")]
    pub rms_corr: Option<f64>,
    #[serde(rename = "astCat")]
    pub ast_cat: Option<String>,
    pub mag: Option<f64>,
    pub band: Option<String>,
    pub disc: Option<String>,
    pub notes: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl OpticalObs {
    /// Convert to a record, using `block_stn` when the element has no station of its own.
    fn into_record(self, block_stn: Option<&str>) -> ObservationRecord {
        ObservationRecord {
            perm_id: non_empty(self.perm_id),
            prov_id: non_empty(self.prov_id),
            trk_sub: non_empty(self.trk_sub),
            disc: non_empty(self.disc).and_then(|d| d.chars().next()),
            notes: non_empty(self.notes),
            prog: non_empty(self.prog),
            mode: self.mode.as_deref().and_then(ObsMode::from_ades),
            obs_time: non_empty(self.obs_time),
            ra: self.ra,
            dec: self.dec,
            mag: self.mag,
            band: non_empty(self.band),
            ast_cat: non_empty(self.ast_cat),
            stn: non_empty(self.stn).or_else(|| block_stn.map(str::to_string)),
            rms_ra: self.rms_ra,
            rms_dec: self.rms_dec,
            rms_corr: self.rms_corr,
            rms_time: self.rms_time,
        }
    }
}

/// Read an ADES XML document back into observation records.
///
/// Both layouts are accepted: standalone `<optical>` children of `<ades>` and
/// `<obsBlock>` groups whose `<obsContext><observatory><mpcCode>` supplies the
/// station of opticals that do not carry one. Block observations come first.
///
/// Arguments
/// ---------
/// * `xml`: the document text
///
/// Return
/// ------
/// * The records, or [`ToolkitError::AdesDeserialize`] when the document does not match
///   the expected structure.
pub fn read_ades(xml: &str) -> Result<Vec<ObservationRecord>, ToolkitError> {
    let ades: Ades = from_str(xml).map_err(|e| ToolkitError::AdesDeserialize(e.to_string()))?;

    let mut records = Vec::new();
    for block in ades.obs_blocks {
        let mpc_code = block
            .obs_context
            .and_then(|ctx| ctx.observatory)
            .map(|obs| obs.mpc_code.trim().to_string());
        records.extend(
            block
                .obs_data
                .opticals
                .into_iter()
                .map(|optical| optical.into_record(mpc_code.as_deref())),
        );
    }
    records.extend(
        ades.flat_opticals
            .into_iter()
            .map(|optical| optical.into_record(None)),
    );
    Ok(records)
}
