//! Error types for JSON value conversions.
//!
//! Conversions in this crate never fall back to a default value: a JSON value
//! that does not fit its declared field type is an error.

use thiserror::Error;

/// Errors that can occur during JSON value conversions.
#[derive(Debug, Error)]
pub enum JsonTypesError {
    /// JSON value kind does not match the declared field type.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Number does not fit the declared numeric width.
    #[error("Numeric overflow converting {value} to {target_type}")]
    NumericOverflow { value: String, target_type: String },

    /// NaN and infinities have no JSON representation.
    #[error("Non-finite float {value} cannot be represented in JSON")]
    NonFiniteFloat { value: f64 },

    /// Timestamp whose year has no four-digit RFC 3339 form.
    #[error("Timestamp {value} is outside the years 0000-9999")]
    TimestampOutOfRange { value: String },

    /// Invalid timestamp string.
    #[error("Invalid timestamp format: {value}. Expected RFC 3339")]
    InvalidTimestamp { value: String },

    /// Invalid UUID string.
    #[error("Invalid UUID format: {value}")]
    InvalidUuid { value: String },

    /// Invalid base64 in a bytes field.
    #[error("Invalid base64 for bytes field: {reason}")]
    InvalidBase64 { reason: String },

    /// Required member of a nested record is missing.
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    /// `null` for a field that is not nullable.
    #[error("Unexpected null for non-nullable field '{field}' of type {expected}")]
    UnexpectedNull { field: String, expected: String },
}

/// Result type for JSON value conversions.
pub type Result<T> = std::result::Result<T, JsonTypesError>;
