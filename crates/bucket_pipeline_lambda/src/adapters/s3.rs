use std::future::Future;

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::{ByteStream, DateTime as SmithyDateTime};
use bucket_pipeline_core::contract::ObjectSummary;
use chrono::{DateTime, Utc};

use crate::adapters::object_store::{
    bucket_location, object_location, ObjectStore, StoreError, StoredObject,
};

/// `ObjectStore` backed by the S3 SDK. The client is built once per process
/// and shared across invocations.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    pub async fn from_env() -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&aws_config))
    }

    async fn fetch(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|error| classify_error("get_object", object_location(bucket, key), error))?;

        let content_type = output.content_type().map(str::to_string);
        let e_tag = output.e_tag().map(str::to_string);
        let last_modified = output.last_modified().and_then(to_utc);
        let declared_size = output
            .content_length()
            .and_then(|value| u64::try_from(value).ok());

        let body = output
            .body
            .collect()
            .await
            .map_err(|error| StoreError::Service {
                operation: "get_object",
                location: object_location(bucket, key),
                message: format!("failed to read object body: {error}"),
            })?
            .into_bytes()
            .to_vec();

        Ok(StoredObject {
            key: key.to_string(),
            size: declared_size.or(Some(body.len() as u64)),
            body,
            content_type,
            last_modified,
            e_tag,
        })
    }

    async fn store(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map(|_| ())
            .map_err(|error| classify_error("put_object", object_location(bucket, key), error))
    }

    async fn list(&self, bucket: &str, max_keys: usize) -> Result<Vec<ObjectSummary>, StoreError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(i32::try_from(max_keys).unwrap_or(i32::MAX))
            .send()
            .await
            .map_err(|error| classify_error("list_objects_v2", bucket_location(bucket), error))?;

        Ok(output
            .contents()
            .iter()
            .take(max_keys)
            .map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().and_then(|value| u64::try_from(value).ok()),
                last_modified: object.last_modified().and_then(to_utc),
                e_tag: object.e_tag().map(str::to_string),
            })
            .collect())
    }
}

impl ObjectStore for S3ObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        block_on(self.fetch(bucket, key))
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        block_on(self.store(bucket, key, body, content_type))
    }

    fn list_objects(
        &self,
        bucket: &str,
        max_keys: usize,
    ) -> Result<Vec<ObjectSummary>, StoreError> {
        block_on(self.list(bucket, max_keys))
    }
}

// Handlers are synchronous; requires the multi-threaded runtime.
fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn classify_error<E, R>(operation: &'static str, location: String, error: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = error
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&error).to_string());

    match error.code() {
        Some("NoSuchKey" | "NoSuchBucket" | "NotFound") => StoreError::NotFound { location, message },
        Some("AccessDenied" | "AllAccessDisabled" | "InvalidAccessKeyId") => {
            StoreError::AccessDenied { location, message }
        }
        _ => StoreError::Service {
            operation,
            location,
            message,
        },
    }
}

fn to_utc(value: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}
