//! Validation errors for market-data identifiers

use thiserror::Error;

/// Errors raised when constructing identifiers from untrusted input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Currency code is not one of the supported codes
    #[error("Unsupported currency code: '{0}'")]
    UnsupportedCurrency(String),

    /// Required field was empty or whitespace
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: &'static str },
}
