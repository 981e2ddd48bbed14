use thiserror::Error;

use crate::obs80::FormatError;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Error during the 80 column record parsing: {0}")]
    Obs80Format(#[from] FormatError),

    #[error("Unable to write ADES XML: {0}")]
    AdesXml(String),

    #[error("Unable to read ADES XML: {0}")]
    AdesDeserialize(String),

    #[error("Invalid MPEC identifier: {0}")]
    InvalidMpecId(String),

    #[error("HTTP reqwest error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV row error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Empty response body from {0}")]
    EmptyResponse(String),
}

impl PartialEq for ToolkitError {
    fn eq(&self, other: &Self) -> bool {
        use ToolkitError::*;
        match (self, other) {
            (Obs80Format(a), Obs80Format(b)) => a == b,
            (AdesXml(a), AdesXml(b)) => a == b,
            (AdesDeserialize(a), AdesDeserialize(b)) => a == b,
            (InvalidMpecId(a), InvalidMpecId(b)) => a == b,
            (EmptyResponse(a), EmptyResponse(b)) => a == b,

            // foreign payloads are not comparable: same variant is enough
            (Http(_), Http(_)) => true,
            (Io(_), Io(_)) => true,
            (Csv(_), Csv(_)) => true,

            _ => false,
        }
    }
}

#[cfg(test)]
mod toolkit_errors_test {
    use super::*;

    fn decode_line(line: &str) -> Result<(), ToolkitError> {
        crate::obs80::decode(line, &Default::default())?;
        Ok(())
    }

    #[test]
    fn test_format_error_converts() {
        let line =
            "     K09R05F  C2009 13 15.23433 22 52 22.62 -14 47 03.2          20.8 Vr~097wG96";
        let err = decode_line(line).unwrap_err();
        assert_eq!(
            err,
            ToolkitError::Obs80Format(FormatError::InvalidDate("2009 13 15.23433".into()))
        );
        assert!(err.to_string().starts_with("Error during the 80 column record parsing"));
    }

    #[test]
    fn test_partial_eq() {
        assert_eq!(
            ToolkitError::InvalidMpecId("x".into()),
            ToolkitError::InvalidMpecId("x".into())
        );
        assert_ne!(
            ToolkitError::InvalidMpecId("x".into()),
            ToolkitError::EmptyResponse("x".into())
        );
        let io = || ToolkitError::from(std::io::Error::other("disk"));
        assert_eq!(io(), io());
    }
}
