use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Leading path segment for every object written by the processor.
pub const PROCESSED_PREFIX: &str = "processed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyDecodeError {
    #[error("object key '{key}' does not decode to valid UTF-8: {reason}")]
    InvalidUtf8 { key: String, reason: String },
}

/// Decodes a notification object key: literal `+` becomes a space, then
/// `%XX` escapes are resolved. Escapes that are not valid hex pass through
/// untouched on purpose, so the record is still attempted under the literal
/// key instead of failing before the store is consulted.
pub fn decode_object_key(raw_key: &str) -> Result<String, KeyDecodeError> {
    let spaced = raw_key.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|error| KeyDecodeError::InvalidUtf8 {
            key: raw_key.to_string(),
            reason: error.to_string(),
        })
}

/// Destination key for a processed copy. Downstream consumers rely on the
/// exact `processed/<key>` shape, including keys that already contain `/`.
pub fn processed_object_key(decoded_key: &str) -> String {
    format!("{PROCESSED_PREFIX}/{decoded_key}")
}
