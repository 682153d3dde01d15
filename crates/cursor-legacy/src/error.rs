//! Error types for the legacy cursor format.

use thiserror::Error;

/// Errors that can occur while reading or coercing legacy segments.
#[derive(Debug, Error)]
pub enum LegacyError {
    /// Segment has no `?KIND` suffix.
    #[error("Invalid legacy field: segment '{segment}' has no kind suffix")]
    InvalidSegment { segment: String },

    /// `TIME` segment whose value is not an RFC 3339 timestamp.
    #[error("Invalid legacy timestamp: {value}")]
    InvalidTimestamp { value: String },

    /// Legacy text could not be read as the declared field type.
    #[error("Failed to parse '{value}' as {expected_type}: {message}")]
    Coercion {
        value: String,
        expected_type: String,
        message: String,
    },
}

/// Result type for legacy format operations.
pub type Result<T> = std::result::Result<T, LegacyError>;
