use super::{FigureError, IngestError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for FigureError {
    fn from(message: &'static str) -> Self {
        FigureError::TestExpectation { message }
    }
}

impl From<String> for FigureError {
    fn from(value: String) -> Self {
        FigureError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for IngestError {
    fn from(message: &'static str) -> Self {
        IngestError::TestExpectation { message }
    }
}

impl From<String> for IngestError {
    fn from(value: String) -> Self {
        IngestError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
