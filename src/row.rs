//! Rows from JSON objects.

use anyhow::{Context, Result};
use cursor_core::{RecordSchema, Row};

/// Parse a JSON object into a row.
///
/// With a schema, members it describes are typed by it; everything else is
/// inferred from the JSON value.
pub fn parse_row(json: &str, schema: Option<&RecordSchema>) -> Result<Row> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("Row is not valid JSON")?;
    let obj = value
        .as_object()
        .context("Row must be a JSON object")?;
    Ok(cursor_json::json_object_to_row(obj, schema)?)
}
