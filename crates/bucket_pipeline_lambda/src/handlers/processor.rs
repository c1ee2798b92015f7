use bucket_pipeline_core::contract::{ProcessorSummary, RecordOutcome};
use bucket_pipeline_core::notification::{
    parse_event_records, EventRecord, NotificationError, RejectedRecord,
};
use bucket_pipeline_core::processing::{processed_content, resolve_content_type};
use bucket_pipeline_core::storage_keys::processed_object_key;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::adapters::object_store::{ObjectStore, StoreError};

const COMPONENT: &str = "object_processor";

#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Bucket that receives processed copies. Normally the source bucket.
    pub destination_bucket: String,
    pub now: fn() -> DateTime<Utc>,
}

impl ProcessorConfig {
    pub fn new(destination_bucket: impl Into<String>) -> Self {
        Self {
            destination_bucket: destination_bucket.into(),
            now: Utc::now,
        }
    }
}

/// Processes one notification batch. Per-record failures are reported in the
/// summary; only a payload without a `Records` array is an error.
pub fn handle_notification(
    payload: &Value,
    config: &ProcessorConfig,
    store: &impl ObjectStore,
) -> Result<ProcessorSummary, NotificationError> {
    let records = parse_event_records(payload).inspect_err(|error| {
        error!(component = COMPONENT, event = "invalid_notification", error = %error);
    })?;

    info!(
        component = COMPONENT,
        event = "batch_started",
        records = records.len(),
        destination_bucket = %config.destination_bucket,
    );

    let summary = ProcessorSummary::from_outcomes(process_batch(records, config, store));

    info!(
        component = COMPONENT,
        event = "batch_completed",
        records_processed = summary.records_processed,
        succeeded = summary.succeeded,
        failed = summary.failed,
        results = %serde_json::to_string(&summary.results).unwrap_or_default(),
    );
    Ok(summary)
}

/// Maps every parsed record to an outcome, in input order. A failing record
/// never stops its siblings and nothing is retried.
pub fn process_batch(
    records: Vec<Result<EventRecord, RejectedRecord>>,
    config: &ProcessorConfig,
    store: &impl ObjectStore,
) -> Vec<RecordOutcome> {
    records
        .into_iter()
        .map(|entry| match entry {
            Ok(record) => process_record(&record, config, store),
            Err(rejected) => {
                warn!(
                    component = COMPONENT,
                    event = "record_rejected",
                    key = %rejected.key,
                    event_name = %rejected.event_name,
                    error = %rejected.error,
                );
                RecordOutcome::Failed {
                    key: rejected.key,
                    event_name: rejected.event_name,
                    error: rejected.error.to_string(),
                }
            }
        })
        .collect()
}

pub fn process_record(
    record: &EventRecord,
    config: &ProcessorConfig,
    store: &impl ObjectStore,
) -> RecordOutcome {
    info!(
        component = COMPONENT,
        event = "record_started",
        event_name = %record.event_name,
        kind = record.kind.as_str(),
        bucket = %record.bucket,
        key = %record.key,
        notified_size = record.size,
        event_time = ?record.event_time,
    );

    match copy_with_timestamp(record, config, store) {
        Ok(processed_key) => {
            info!(
                component = COMPONENT,
                event = "record_processed",
                key = %record.key,
                processed_key = %processed_key,
            );
            RecordOutcome::Processed {
                original_key: record.key.clone(),
                processed_key,
                event_name: record.event_name.clone(),
            }
        }
        Err(store_error) => {
            error!(
                component = COMPONENT,
                event = "record_failed",
                key = %record.key,
                error = %store_error,
            );
            RecordOutcome::Failed {
                key: record.key.clone(),
                event_name: record.event_name.clone(),
                error: store_error.to_string(),
            }
        }
    }
}

fn copy_with_timestamp(
    record: &EventRecord,
    config: &ProcessorConfig,
    store: &impl ObjectStore,
) -> Result<String, StoreError> {
    let object = store.get_object(&record.bucket, &record.key)?;
    info!(
        component = COMPONENT,
        event = "object_fetched",
        key = %record.key,
        size = object.body.len(),
        content_type = object.content_type.as_deref().unwrap_or_default(),
    );

    let processed_key = processed_object_key(&record.key);
    let content = processed_content(&(config.now)(), &object.body);
    store.put_object(
        &config.destination_bucket,
        &processed_key,
        content,
        resolve_content_type(object.content_type.as_deref()),
    )?;

    Ok(processed_key)
}

#[cfg(test)]
mod tests {
    use bucket_pipeline_core::processing::DEFAULT_CONTENT_TYPE;
    use serde_json::json;

    use super::*;
    use crate::test_support::{fixed_time, InMemoryStore};

    const BUCKET: &str = "level2-s2-bucket";

    fn config() -> ProcessorConfig {
        ProcessorConfig {
            destination_bucket: BUCKET.to_string(),
            now: fixed_time,
        }
    }

    fn record(key: &str) -> Value {
        json!({
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "eventTime": "2026-10-18T09:29:59.000Z",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": {"name": BUCKET},
                "object": {"key": key, "size": 5}
            }
        })
    }

    fn batch(keys: &[&str]) -> Value {
        json!({"Records": keys.iter().map(|key| record(key)).collect::<Vec<_>>()})
    }

    #[test]
    fn writes_timestamped_copy_under_processed_prefix() {
        let store = InMemoryStore::new();
        store.seed_object(BUCKET, "notes/today.md", b"# hi\n", Some("text/markdown"));

        let summary = handle_notification(&batch(&["notes/today.md"]), &config(), &store)
            .expect("batch should complete");

        assert_eq!(
            summary.results,
            vec![RecordOutcome::Processed {
                original_key: "notes/today.md".to_string(),
                processed_key: "processed/notes/today.md".to_string(),
                event_name: "ObjectCreated:Put".to_string(),
            }]
        );

        let written = store
            .object(BUCKET, "processed/notes/today.md")
            .expect("processed object should exist");
        assert_eq!(written.body, b"Processed at 2026-10-18T09:30:00.000Z\n# hi\n");
        assert_eq!(written.content_type.as_deref(), Some("text/markdown"));
    }

    #[test]
    fn decodes_plus_as_space_before_fetching() {
        let store = InMemoryStore::new();
        store.seed_object(BUCKET, "a b.txt", b"spaced", None);

        let summary = handle_notification(&batch(&["a+b.txt"]), &config(), &store)
            .expect("batch should complete");

        assert!(summary.results[0].is_success());
        assert_eq!(store.calls()[0], format!("get {BUCKET}/a b.txt"));

        let written = store
            .object(BUCKET, "processed/a b.txt")
            .expect("processed object should exist");
        assert_eq!(written.content_type.as_deref(), Some(DEFAULT_CONTENT_TYPE));
    }

    #[test]
    fn missing_middle_record_does_not_abort_batch() {
        let store = InMemoryStore::new();
        store.seed_object(BUCKET, "one.txt", b"1", None);
        store.seed_object(BUCKET, "three.txt", b"3", None);

        let summary = handle_notification(
            &batch(&["one.txt", "two.txt", "three.txt"]),
            &config(),
            &store,
        )
        .expect("batch should complete despite a failed record");

        assert_eq!(summary.records_processed, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let keys: Vec<&str> = summary.results.iter().map(RecordOutcome::key).collect();
        assert_eq!(keys, vec!["one.txt", "two.txt", "three.txt"]);

        match &summary.results[1] {
            RecordOutcome::Failed { error, .. } => assert!(!error.is_empty()),
            other => panic!("expected failure for missing object, got {other:?}"),
        }
        assert!(store.object(BUCKET, "processed/one.txt").is_some());
        assert!(store.object(BUCKET, "processed/three.txt").is_some());
        assert!(store.object(BUCKET, "processed/two.txt").is_none());
    }

    #[test]
    fn write_failure_is_reported_per_record() {
        let store = InMemoryStore::new();
        store.seed_object(BUCKET, "a.txt", b"a", None);
        store.seed_object(BUCKET, "b.txt", b"b", None);
        store.fail_put_for("processed/a.txt");

        let summary = handle_notification(&batch(&["a.txt", "b.txt"]), &config(), &store)
            .expect("batch should complete");

        match &summary.results[0] {
            RecordOutcome::Failed { key, error, .. } => {
                assert_eq!(key, "a.txt");
                assert!(error.contains("simulated write failure"));
            }
            other => panic!("expected write failure, got {other:?}"),
        }
        assert!(summary.results[1].is_success());
    }

    #[test]
    fn emits_one_outcome_per_record_even_when_all_fail() {
        let store = InMemoryStore::new();
        store.deny_access();

        let payload = json!({
            "Records": [
                record("x.txt"),
                {"eventName": "ObjectCreated:Put"},
                record("bad%FF"),
                record("y.txt"),
            ]
        });
        let summary =
            handle_notification(&payload, &config(), &store).expect("batch should complete");

        assert_eq!(summary.results.len(), 4);
        assert_eq!(summary.failed, 4);
        assert_eq!(summary.results[2].key(), "bad%FF");
        assert_eq!(summary.results[3].key(), "y.txt");
    }

    #[test]
    fn reprocessing_changes_only_the_timestamp_line() {
        let store = InMemoryStore::new();
        store.seed_object(BUCKET, "data.bin", &[0, 1, 2, 255], Some("application/octet-stream"));

        fn later() -> DateTime<Utc> {
            fixed_time() + chrono::Duration::minutes(5)
        }

        handle_notification(&batch(&["data.bin"]), &config(), &store)
            .expect("first run should complete");
        let first = store
            .object(BUCKET, "processed/data.bin")
            .expect("first copy should exist");

        let later_config = ProcessorConfig {
            now: later,
            ..config()
        };
        handle_notification(&batch(&["data.bin"]), &later_config, &store)
            .expect("second run should complete");
        let second = store
            .object(BUCKET, "processed/data.bin")
            .expect("second copy should exist");

        assert_ne!(first.body, second.body);
        assert!(first.body.ends_with(&[b'\n', 0, 1, 2, 255]));
        assert!(second.body.ends_with(&[b'\n', 0, 1, 2, 255]));
    }

    #[test]
    fn writes_to_configured_destination_bucket() {
        let store = InMemoryStore::new();
        store.seed_object(BUCKET, "a.txt", b"a", None);
        let config = ProcessorConfig {
            destination_bucket: "archive-bucket".to_string(),
            now: fixed_time,
        };

        handle_notification(&batch(&["a.txt"]), &config, &store).expect("batch should complete");

        assert!(store.object("archive-bucket", "processed/a.txt").is_some());
        assert!(store.object(BUCKET, "processed/a.txt").is_none());
    }

    #[test]
    fn rejects_payload_that_is_not_a_notification() {
        let store = InMemoryStore::new();
        let error = handle_notification(&json!({"hello": "world"}), &config(), &store)
            .expect_err("non-notification payload should fail");

        assert_eq!(error, NotificationError::MissingRecords);
        assert!(store.calls().is_empty());
    }
}
