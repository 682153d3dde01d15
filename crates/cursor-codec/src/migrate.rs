//! Rewriting legacy cursors in the current format.

use cursor_core::CursorValue;
use tracing::debug;

use crate::decoder::{CursorDecoder, Decoded, EmptyReason};
use crate::encoder::CursorEncoder;
use crate::error::{CursorError, Result};

/// Outcome of [`upgrade_legacy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upgrade {
    /// The legacy cursor re-encoded in the current format.
    Upgraded(String),
    /// The cursor was already in the current format.
    AlreadyCurrent,
    /// The cursor decodes to nothing and has nothing to carry over.
    Discarded(EmptyReason),
}

/// Re-encode a legacy cursor in the current format.
///
/// Legacy text is read as each key's declared field type, so `"5"` under a
/// `big_int` key becomes the JSON number `5`.
pub fn upgrade_legacy(
    decoder: &CursorDecoder,
    encoder: &CursorEncoder,
    cursor: &str,
) -> Result<Upgrade> {
    let values = match decoder.decode_detailed(cursor)? {
        Decoded::Current(_) => return Ok(Upgrade::AlreadyCurrent),
        Decoded::Empty(reason) => {
            debug!("Not upgrading cursor: {reason}");
            return Ok(Upgrade::Discarded(reason));
        }
        Decoded::Legacy(values) => values,
    };

    let keys = decoder.keys();
    if values.len() < keys.len() {
        return Err(CursorError::ElementCount {
            expected: keys.len(),
            found: values.len(),
        });
    }

    let typed = keys
        .iter()
        .zip(&values)
        .map(|(key, value)| {
            let field = decoder
                .schema()
                .get_field(key)
                .ok_or_else(|| CursorError::FieldNotFound { field: key.clone() })?;
            Ok(cursor_legacy::coerce_value(value, field)?)
        })
        .collect::<Result<Vec<CursorValue>>>()?;

    Ok(Upgrade::Upgraded(encoder.encode_values(&typed)?))
}
