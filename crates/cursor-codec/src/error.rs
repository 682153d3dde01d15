//! Error types for cursor encoding and decoding.

use cursor_core::SchemaError;
use cursor_json::JsonTypesError;
use cursor_legacy::LegacyError;
use thiserror::Error;

/// Errors returned by [`CursorEncoder`](crate::CursorEncoder) and
/// [`CursorDecoder`](crate::CursorDecoder).
///
/// Unreadable transport and malformed legacy payloads are not errors; they
/// decode to [`Decoded::Empty`](crate::Decoded::Empty).
#[derive(Debug, Error)]
pub enum CursorError {
    /// The decoder's shape does not lead to a record.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A key names a field the record or schema does not have.
    #[error("Field not found: {field}")]
    FieldNotFound { field: String },

    /// A key value could not be converted to or from JSON.
    #[error("Invalid value for field '{field}': {source}")]
    Json {
        field: String,
        #[source]
        source: JsonTypesError,
    },

    /// The JSON payload could not be written.
    #[error("Failed to serialize cursor payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A current-format payload is valid JSON but not an array.
    #[error("Cursor payload is not a JSON array (found {found})")]
    NotAnArray { found: String },

    /// Fewer values than keys.
    #[error("Cursor carries {found} values but {expected} keys are configured")]
    ElementCount { expected: usize, found: usize },

    /// A legacy value could not be read as its field type.
    #[error("Legacy cursor error: {0}")]
    Legacy(#[from] LegacyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

/// Result type for cursor operations.
pub type Result<T> = std::result::Result<T, CursorError>;
