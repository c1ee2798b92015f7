use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::processing::iso_timestamp;

/// Upper bound on objects returned by a single bucket listing.
pub const LISTING_CAP: usize = 10;

pub const PROCESSOR_COMPLETED_MESSAGE: &str = "S3 event processed successfully";
pub const READER_SUCCESS_MESSAGE: &str = "Successfully read bucket contents";
pub const READER_FAILURE_MESSAGE: &str = "Error reading from bucket";

/// Outcome of processing one notification record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Processed {
        original_key: String,
        processed_key: String,
        event_name: String,
    },
    Failed {
        key: String,
        event_name: String,
        error: String,
    },
}

impl RecordOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Processed { original_key, .. } => original_key,
            Self::Failed { key, .. } => key,
        }
    }
}

// Wire shape: {"success": true, "originalKey", "processedKey", "eventName"}
// or {"success": false, "key", "error", "eventName"}.
impl Serialize for RecordOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Processed {
                original_key,
                processed_key,
                event_name,
            } => {
                let mut state = serializer.serialize_struct("RecordOutcome", 4)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("originalKey", original_key)?;
                state.serialize_field("processedKey", processed_key)?;
                state.serialize_field("eventName", event_name)?;
                state.end()
            }
            Self::Failed {
                key,
                event_name,
                error,
            } => {
                let mut state = serializer.serialize_struct("RecordOutcome", 4)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("key", key)?;
                state.serialize_field("error", error)?;
                state.serialize_field("eventName", event_name)?;
                state.end()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorSummary {
    pub message: String,
    pub records_processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<RecordOutcome>,
}

impl ProcessorSummary {
    pub fn from_outcomes(results: Vec<RecordOutcome>) -> Self {
        let succeeded = results.iter().filter(|outcome| outcome.is_success()).count();
        Self {
            message: PROCESSOR_COMPLETED_MESSAGE.to_string(),
            records_processed: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

/// Reader invocation options. The payload is free-form, so it is read
/// field by field rather than deserialised strictly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderRequest {
    pub read_first_object: bool,
}

impl ReaderRequest {
    /// Only a literal JSON `true` under `readFirstObject` opts in. Any other
    /// value, or a payload that is not an object, means listing only.
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            read_first_object: matches!(payload.get("readFirstObject"), Some(Value::Bool(true))),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_timestamp"
    )]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(rename = "etag", skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    /// Number of objects actually listed, never the bucket total.
    pub object_count: usize,
    pub objects: Vec<ObjectSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_object_content: Option<String>,
}

impl BucketSummary {
    pub fn new(objects: Vec<ObjectSummary>, first_object_content: Option<String>) -> Self {
        Self {
            object_count: objects.len(),
            objects,
            first_object_content,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReaderSuccessBody {
    pub message: String,
    pub bucket_name: String,
    pub bucket_arn: String,
    #[serde(flatten)]
    pub summary: BucketSummary,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReaderErrorBody {
    pub message: String,
    pub error: String,
    pub bucket_name: String,
    pub bucket_arn: String,
}

fn serialize_optional_timestamp<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(at) => serializer.serialize_str(&iso_timestamp(at)),
        None => serializer.serialize_none(),
    }
}
