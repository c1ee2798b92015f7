use bucket_pipeline_core::contract::ObjectSummary;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub e_tag: Option<String>,
}

/// Store failures. `location` is an `s3://bucket[/key]` string so the
/// rendered message identifies what was being accessed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("not found: {location}: {message}")]
    NotFound { location: String, message: String },
    #[error("access denied: {location}: {message}")]
    AccessDenied { location: String, message: String },
    #[error("{operation} failed for {location}: {message}")]
    Service {
        operation: &'static str,
        location: String,
        message: String,
    },
}

pub fn object_location(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

pub fn bucket_location(bucket: &str) -> String {
    format!("s3://{bucket}")
}

pub trait ObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError>;

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// Lists at most `max_keys` objects in key order.
    fn list_objects(&self, bucket: &str, max_keys: usize)
        -> Result<Vec<ObjectSummary>, StoreError>;
}
