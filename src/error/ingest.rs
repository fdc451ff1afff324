use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Input directory '{path}' does not exist.")]
    MissingDirectory { path: PathBuf },
    #[error("{path}:{line}: invalid number '{value}': {source}")]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("{path}:{line}: invalid link id '{value}': {source}")]
    InvalidLink {
        path: PathBuf,
        line: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("{path}:{line}: invalid path class '{value}': {source}")]
    InvalidClass {
        path: PathBuf,
        line: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("{path}:{line}: '{prefix}' record appears before any '{section}' record.")]
    OutsideSection {
        path: PathBuf,
        line: usize,
        prefix: String,
        section: &'static str,
    },
    #[error("{path}:{line}: '{prefix}' record is missing fields.")]
    MissingFields {
        path: PathBuf,
        line: usize,
        prefix: String,
    },
    #[error("Unrecognized duration unit '{unit}' in '{value}'.")]
    InvalidDurationUnit { unit: String, value: String },
    #[error("Malformed measurement line '{value}'.")]
    MalformedMeasurement { value: String },
    #[error("Invalid tag pattern: {source}")]
    Pattern {
        #[from]
        source: regex::Error,
    },
    #[error("No experiments found in '{path}'.")]
    NoExperiments { path: PathBuf },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
