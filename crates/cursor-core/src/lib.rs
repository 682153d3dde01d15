//! Core types for pagination cursors.
//!
//! This crate provides the foundational types shared by the cursor crates:
//!
//! - [`FieldType`] - Declared type of a record field
//! - [`FieldSchema`] / [`RecordSchema`] - Record shape, indexed by field name
//! - [`Shape`] / [`Describe`] - Schema references and their reduction to a record
//! - [`CursorValue`] - Dynamically-typed key field value
//! - [`Record`] / [`Row`] - Field access for records being encoded
//!
//! # Architecture
//!
//! ```text
//! cursor-core (this crate)
//!    │
//!    ├─── cursor-json     (current format: CursorValue <-> JSON)
//!    ├─── cursor-legacy   (legacy format: CursorValue <-> "value?KIND")
//!    └─── cursor-codec    (encoder / decoder over both formats)
//! ```
//!
//! # Example
//!
//! ```rust
//! use cursor_core::{CursorValue, FieldType, RecordSchema, Row, Record};
//!
//! let schema = RecordSchema::builder("User")
//!     .field("ID", FieldType::Int64)
//!     .field("Name", FieldType::Text)
//!     .build();
//!
//! let row = Row::builder().field("ID", 5i64).field("Name", "foo").build();
//!
//! assert_eq!(schema.field_names(), vec!["ID", "Name"]);
//! assert_eq!(row.field_value("ID"), Some(CursorValue::Int64(5)));
//! ```

pub mod schema;
pub mod types;
pub mod values;

pub use schema::{Describe, FieldSchema, RecordSchema, RecordSchemaBuilder, SchemaError, Shape};
pub use types::FieldType;
pub use values::{CursorValue, Record, Row, RowBuilder};
