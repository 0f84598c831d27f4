use thiserror::Error;

/// Validation errors for textual digest and algorithm inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a length does not match what the field requires.
    #[error("{field} has length {actual}, expected {expected}")]
    LengthMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Observed length.
        actual: usize,
    },
}
