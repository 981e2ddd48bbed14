pub mod ades;
pub mod cache;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod designation;
pub mod mpec;
pub mod obs80;
pub mod orbit_class;
pub mod time;
pub mod toolkit_errors;

pub use ades::{to_psv, to_xml, validate, ValidationReport};
pub use config::FetchConfig;
pub use mpec::{MpecClient, MpecDocument, MpecType};
pub use obs80::{decode, ObservationRecord, Uncertainties};
pub use toolkit_errors::ToolkitError;
