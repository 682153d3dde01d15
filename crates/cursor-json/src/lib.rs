//! JSON conversions for cursor-core values.
//!
//! Current-format cursors carry their key values as a JSON array. This crate
//! provides both directions of that conversion.
//!
//! # Modules
//!
//! - [`forward`] - CursorValue → JSON value conversion
//! - [`reverse`] - JSON value → CursorValue conversion, directed by the field schema
//!
//! # Example
//!
//! ```rust
//! use cursor_core::{CursorValue, FieldSchema, FieldType};
//! use cursor_json::{to_json, JsonValueWithSchema};
//!
//! // Forward: CursorValue → JSON value
//! let json = to_json(&CursorValue::Int64(42)).unwrap();
//! assert_eq!(json, serde_json::json!(42));
//!
//! // Reverse: JSON value → CursorValue
//! let field = FieldSchema::new("ID", FieldType::Int32);
//! let value = JsonValueWithSchema::new(&json, &field).to_cursor_value().unwrap();
//! assert_eq!(value, CursorValue::Int32(42));
//! ```

pub mod error;
pub mod forward;
pub mod reverse;

pub use error::JsonTypesError;
pub use forward::{format_timestamp, to_json, values_to_json_array, JsonValue};
pub use reverse::{
    json_object_to_row, json_to_cursor_value, json_value_to_cursor, parse_timestamp,
    JsonValueWithSchema,
};
