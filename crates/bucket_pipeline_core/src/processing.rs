use chrono::{DateTime, SecondsFormat, Utc};

/// Content type used when the source object does not carry one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

const PROCESSED_HEADER_PREFIX: &str = "Processed at ";

/// ISO-8601 UTC timestamp with millisecond precision, e.g.
/// `2026-10-18T09:30:00.123Z`.
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Builds the processed copy of an object: a timestamp line followed by the
/// original bytes, unchanged.
pub fn processed_content(processed_at: &DateTime<Utc>, original: &[u8]) -> Vec<u8> {
    let header = format!("{PROCESSED_HEADER_PREFIX}{}\n", iso_timestamp(processed_at));
    let mut content = Vec::with_capacity(header.len() + original.len());
    content.extend_from_slice(header.as_bytes());
    content.extend_from_slice(original);
    content
}

pub fn resolve_content_type(source: Option<&str>) -> &str {
    match source {
        Some(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_CONTENT_TYPE,
    }
}
