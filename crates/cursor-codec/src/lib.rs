//! Opaque pagination cursors.
//!
//! A cursor records the key field values of the last item a client has seen.
//! [`CursorEncoder`] writes them as the base64 of a JSON array, one element
//! per key; [`CursorDecoder`] reads them back, typed by the record's schema.
//!
//! The decoder also understands the older `value?KIND` format so that cursors
//! handed out before the JSON format keep working. Cursors it cannot read at
//! all decode to an empty value list rather than an error: a client with a
//! stale or mangled cursor simply starts again from the first page.
//!
//! # Example
//!
//! ```rust
//! use cursor_codec::{CursorDecoder, CursorEncoder};
//! use cursor_core::{CursorValue, FieldType, RecordSchema, Row, Shape};
//!
//! let schema = RecordSchema::builder("Item")
//!     .field("ID", FieldType::Int64)
//!     .field("Name", FieldType::Text)
//!     .build();
//!
//! let encoder = CursorEncoder::new(["ID", "Name"]);
//! let decoder = CursorDecoder::new(&Shape::Record(schema), ["ID", "Name"]).unwrap();
//!
//! let row = Row::builder().field("ID", 5i64).field("Name", "foo").build();
//! let cursor = encoder.encode(&row).unwrap();
//! assert_eq!(cursor, "WzUsImZvbyJd");
//!
//! let values = decoder.decode(&cursor).unwrap();
//! assert_eq!(values, vec![CursorValue::Int64(5), CursorValue::text("foo")]);
//! ```

mod config;
mod decoder;
mod encoder;
pub mod error;
mod migrate;


pub use config::{ArityPolicy, CodecConfig, LegacyConfig};
pub use cursor_legacy::TimestampFallback;
pub use decoder::{CursorDecoder, CursorFormat, Decoded, EmptyReason};
pub use encoder::CursorEncoder;
pub use error::{CursorError, Result};
pub use migrate::{upgrade_legacy, Upgrade};
