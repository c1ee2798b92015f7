//! Object store notification payloads.
//!
//! The dispatcher sends `{ "Records": [...] }`. Each record is parsed on its
//! own so a single malformed entry is reported against that entry instead of
//! rejecting the whole batch.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::storage_keys::{decode_object_key, KeyDecodeError};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NotificationRecord {
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "eventTime", default)]
    pub event_time: Option<String>,
    pub s3: NotificationEntity,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NotificationEntity {
    pub bucket: NotificationBucket,
    pub object: NotificationObject,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NotificationBucket {
    pub name: String,
    #[serde(default)]
    pub arn: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NotificationObject {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(rename = "eTag", default)]
    pub e_tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Created,
    Removed,
    Other,
}

impl EventKind {
    pub fn classify(event_name: &str) -> Self {
        // e.g. "ObjectCreated:Put", "s3:ObjectRemoved:Delete"
        if event_name.contains("ObjectCreated") {
            Self::Created
        } else if event_name.contains("ObjectRemoved") {
            Self::Removed
        } else {
            Self::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Removed => "removed",
            Self::Other => "other",
        }
    }
}

/// A notification record with its key decoded and ready for store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub bucket: String,
    pub key: String,
    pub event_name: String,
    pub kind: EventKind,
    pub event_time: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

impl EventRecord {
    pub fn from_notification(record: NotificationRecord) -> Result<Self, KeyDecodeError> {
        let key = decode_object_key(&record.s3.object.key)?;
        let event_time = record
            .event_time
            .as_deref()
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|value| value.with_timezone(&Utc));

        Ok(Self {
            bucket: record.s3.bucket.name,
            key,
            kind: EventKind::classify(&record.event_name),
            event_name: record.event_name,
            event_time,
            size: record.s3.object.size,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("notification payload must include a Records array")]
    MissingRecords,
    #[error("malformed notification record: {0}")]
    MalformedRecord(String),
    #[error(transparent)]
    Key(#[from] KeyDecodeError),
}

/// A record that could not be turned into an [`EventRecord`]. The key and
/// event name are whatever could be recovered from the raw JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub key: String,
    pub event_name: String,
    pub error: NotificationError,
}

/// Splits a notification payload into one parse result per record, in input
/// order. Only a payload without a `Records` array is rejected as a whole.
pub fn parse_event_records(
    payload: &Value,
) -> Result<Vec<Result<EventRecord, RejectedRecord>>, NotificationError> {
    let records = payload
        .get("Records")
        .and_then(Value::as_array)
        .ok_or(NotificationError::MissingRecords)?;

    Ok(records.iter().map(parse_event_record).collect())
}

fn parse_event_record(value: &Value) -> Result<EventRecord, RejectedRecord> {
    let reject = |error: NotificationError| RejectedRecord {
        key: value
            .pointer("/s3/object/key")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        event_name: value
            .get("eventName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        error,
    };

    let record = NotificationRecord::deserialize(value)
        .map_err(|error| reject(NotificationError::MalformedRecord(error.to_string())))?;
    EventRecord::from_notification(record).map_err(|error| reject(error.into()))
}
