use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FigureError {
    #[error("Failed to read figure '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse figure '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Figure has no output file name.")]
    MissingFileName,
    #[error("Unsupported output format '{ext}' for '{path}'. Use .png or .svg.")]
    UnsupportedFormat { path: PathBuf, ext: String },
    #[error("Item {index} ({kind}): x has {x_len} values but y has {y_len}.")]
    LengthMismatch {
        index: usize,
        kind: &'static str,
        x_len: usize,
        y_len: usize,
    },
    #[error("Item {index} ({kind}): {count} colors for {series} series.")]
    PaletteMismatch {
        index: usize,
        kind: &'static str,
        count: usize,
        series: usize,
    },
    #[error("Invalid format string '{format}'.")]
    InvalidFormatString { format: String },
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
