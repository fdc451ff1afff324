use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Unknown plot selector '{value}'.")]
    UnknownPlotSelector { value: String },
    #[error("Selector '1-7' needs varying policing or shaping across experiments.")]
    AmbiguousQosSelector,
    #[error("Unknown graph '{value}'. Use truth, inferred, delta, truthSinglePath, errorPath1, errorPath2, errorExternal, errorInternal, errorInternal1 or errorInternal2.")]
    UnknownGraph { value: String },
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Value '{value}' must be a positive number.")]
    NotPositive { value: String },
    #[error("Unsupported output format '{value}'. Use png or svg.")]
    UnsupportedFormat { value: String },
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
