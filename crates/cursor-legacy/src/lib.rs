//! Legacy delimited cursor format.
//!
//! Before cursors carried a JSON array, each key value was written as a
//! `value?KIND` segment and segments were joined with `,`. Only two kinds were
//! ever produced: `TIME` for timestamps and `STRING` for everything else.
//!
//! # Modules
//!
//! - [`forward`] - CursorValue → `value?KIND` segment
//! - [`reverse`] - segment → CursorValue, plus schema-directed coercion
//!
//! # Example
//!
//! ```rust
//! use cursor_core::CursorValue;
//! use cursor_legacy::{decode_payload, encode_payload, TimestampFallback};
//!
//! let payload = encode_payload(&[CursorValue::Int64(5), CursorValue::text("foo")]);
//! assert_eq!(payload, "5?STRING,foo?STRING");
//!
//! let values = decode_payload(&payload, TimestampFallback::Now).unwrap();
//! assert_eq!(values, vec![CursorValue::text("5"), CursorValue::text("foo")]);
//! ```

use std::fmt;

pub mod error;
pub mod forward;
pub mod reverse;

pub use error::{LegacyError, Result};
pub use forward::{encode_payload, encode_segment, format_legacy_timestamp, legacy_text};
pub use reverse::{
    coerce_text, coerce_value, decode_payload, decode_segment, split_segment,
    LegacyTextWithSchema, TimestampFallback,
};

/// Kind tag for plain text segments.
pub const KIND_STRING: &str = "STRING";

/// Kind tag for timestamp segments.
pub const KIND_TIME: &str = "TIME";

/// Separator between segments.
pub const SEGMENT_SEPARATOR: char = ',';

/// Separator between a segment's value and its kind tag.
pub const KIND_SEPARATOR: char = '?';

/// Kind tag of a legacy segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyKind {
    String,
    Time,
    /// Any other tag. Read back as text.
    Other(String),
}

impl LegacyKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            KIND_STRING => Self::String,
            KIND_TIME => Self::Time,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => KIND_STRING,
            Self::Time => KIND_TIME,
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for LegacyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
