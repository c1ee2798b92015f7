use bucket_pipeline_core::contract::ProcessorSummary;
use bucket_pipeline_lambda::adapters::s3::S3ObjectStore;
use bucket_pipeline_lambda::config::RuntimeConfig;
use bucket_pipeline_lambda::handlers::processor::{handle_notification, ProcessorConfig};
use bucket_pipeline_lambda::telemetry::init_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &ProcessorConfig,
    store: &S3ObjectStore,
) -> Result<ProcessorSummary, Error> {
    handle_notification(&event.payload, config, store).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let runtime_config = RuntimeConfig::from_env();
    let config = ProcessorConfig::new(runtime_config.bucket_name);
    let store = S3ObjectStore::from_env().await;

    let config = &config;
    let store = &store;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, config, store).await
    }))
    .await
}
