//! Schema-less cursor inspection.

use anyhow::{bail, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cursor_codec::{Decoded, EmptyReason};
use cursor_core::CursorValue;
use cursor_legacy::TimestampFallback;

/// Decode a cursor without knowing its record type.
///
/// Current-format values are inferred from their JSON form. Legacy timestamps
/// that do not parse are reported as malformed instead of being replaced.
pub fn inspect(cursor: &str) -> Result<Decoded> {
    let Ok(bytes) = STANDARD.decode(cursor) else {
        return Ok(Decoded::Empty(EmptyReason::InvalidTransport));
    };

    let text = String::from_utf8_lossy(&bytes);
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::Array(elements)) => Ok(Decoded::Current(
            elements.iter().map(cursor_json::json_value_to_cursor).collect(),
        )),
        Ok(other) => bail!("Cursor payload is not a JSON array: {other}"),
        Err(_) => match cursor_legacy::decode_payload(&text, TimestampFallback::Reject) {
            Ok(values) => Ok(Decoded::Legacy(values)),
            Err(_) => Ok(Decoded::Empty(EmptyReason::MalformedLegacy)),
        },
    }
}

/// Render values as a single-line JSON array.
pub fn render_values(values: &[CursorValue]) -> Result<String> {
    let json = cursor_json::values_to_json_array(values)?;
    Ok(serde_json::to_string(&json)?)
}
