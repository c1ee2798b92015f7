use bucket_pipeline_core::contract::{
    BucketSummary, ReaderErrorBody, ReaderRequest, ReaderSuccessBody, LISTING_CAP,
    READER_FAILURE_MESSAGE, READER_SUCCESS_MESSAGE,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::adapters::object_store::{ObjectStore, StoreError};
use crate::config::RuntimeConfig;
use crate::handlers::response::{
    error_response, normalize_apigw_event, success_response, ApiGatewayResponse,
};

const COMPONENT: &str = "bucket_reader";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderResponse {
    Ok(ReaderSuccessBody),
    Error(ReaderErrorBody),
}

impl ReaderResponse {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Ok(_) => 200,
            Self::Error(_) => 500,
        }
    }

    pub fn into_api_response(self) -> ApiGatewayResponse {
        let status_code = self.status_code();
        match self {
            Self::Ok(body) => success_response(status_code, body),
            Self::Error(body) => error_response(status_code, body),
        }
    }
}

/// Entry point for one reader invocation. Every path produces a 200 or 500
/// response; an unreadable request is served as a plain listing.
pub fn handle_reader_event(
    event: Value,
    config: &RuntimeConfig,
    store: &impl ObjectStore,
) -> ApiGatewayResponse {
    let request = parse_request(event);
    read_bucket(&request, config, store).into_api_response()
}

pub fn read_bucket(
    request: &ReaderRequest,
    config: &RuntimeConfig,
    store: &impl ObjectStore,
) -> ReaderResponse {
    info!(
        component = COMPONENT,
        event = "read_started",
        bucket_name = %config.bucket_name,
        bucket_arn = %config.bucket_arn,
        read_first_object = request.read_first_object,
    );

    match summarize_bucket(request, &config.bucket_name, store) {
        Ok(summary) => ReaderResponse::Ok(ReaderSuccessBody {
            message: READER_SUCCESS_MESSAGE.to_string(),
            bucket_name: config.bucket_name.clone(),
            bucket_arn: config.bucket_arn.clone(),
            summary,
        }),
        Err(store_error) => {
            error!(
                component = COMPONENT,
                event = "read_failed",
                bucket_name = %config.bucket_name,
                error = %store_error,
            );
            ReaderResponse::Error(ReaderErrorBody {
                message: READER_FAILURE_MESSAGE.to_string(),
                error: store_error.to_string(),
                bucket_name: config.bucket_name.clone(),
                bucket_arn: config.bucket_arn.clone(),
            })
        }
    }
}

fn summarize_bucket(
    request: &ReaderRequest,
    bucket: &str,
    store: &impl ObjectStore,
) -> Result<BucketSummary, StoreError> {
    let mut objects = store.list_objects(bucket, LISTING_CAP)?;
    objects.truncate(LISTING_CAP);
    info!(component = COMPONENT, event = "objects_listed", found = objects.len());

    let first_object_content = match objects.first() {
        Some(first) if request.read_first_object => {
            let object = store.get_object(bucket, &first.key)?;
            info!(
                component = COMPONENT,
                event = "first_object_read",
                key = %first.key,
                size = object.body.len(),
            );
            Some(String::from_utf8_lossy(&object.body).into_owned())
        }
        _ => None,
    };

    Ok(BucketSummary::new(objects, first_object_content))
}

fn parse_request(event: Value) -> ReaderRequest {
    match normalize_apigw_event(event) {
        Ok(payload) => ReaderRequest::from_payload(&payload),
        Err(message) => {
            warn!(component = COMPONENT, event = "request_ignored", error = %message);
            ReaderRequest::default()
        }
    }
}
