// ⚠️ Spot Check Errors
//
// Parse failures are fatal for the document (and abort the ingest batch).
// Mismatches are never errors; they are ordinary check results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotCheckError {
    #[error("could not parse scraped bill filename: {0}")]
    InvalidFilename(String),

    #[error("could not parse scraped bill print no: {0}")]
    InvalidPrintNo(String),

    #[error("unknown bill type: {0}")]
    UnknownBillType(String),

    #[error("scraped bill document has no {0}")]
    MissingElement(&'static str),

    #[error("no bill text reference available for {0}")]
    MissingReference(String),

    #[error("invalid document selector: {0}")]
    InvalidSelector(String),

    #[error("invalid text pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl SpotCheckError {
    /// True for the malformed-document family (filename, print no, structure)
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            SpotCheckError::InvalidFilename(_)
                | SpotCheckError::InvalidPrintNo(_)
                | SpotCheckError::UnknownBillType(_)
                | SpotCheckError::MissingElement(_)
        )
    }
}
