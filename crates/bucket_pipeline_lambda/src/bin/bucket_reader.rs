use bucket_pipeline_lambda::adapters::s3::S3ObjectStore;
use bucket_pipeline_lambda::config::RuntimeConfig;
use bucket_pipeline_lambda::handlers::reader::handle_reader_event;
use bucket_pipeline_lambda::handlers::response::ApiGatewayResponse;
use bucket_pipeline_lambda::telemetry::init_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &RuntimeConfig,
    store: &S3ObjectStore,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_reader_event(event.payload, config, store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = RuntimeConfig::from_env();
    let store = S3ObjectStore::from_env().await;

    let config = &config;
    let store = &store;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, config, store).await
    }))
    .await
}
