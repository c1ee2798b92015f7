use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use bucket_pipeline_core::contract::ObjectSummary;
use chrono::{DateTime, TimeZone, Utc};

use crate::adapters::object_store::{
    bucket_location, object_location, ObjectStore, StoreError, StoredObject,
};

/// In-memory `ObjectStore` with per-key failure injection.
pub(crate) struct InMemoryStore {
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    failing_puts: Mutex<BTreeSet<String>>,
    access_denied: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            failing_puts: Mutex::new(BTreeSet::new()),
            access_denied: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn seed_object(&self, bucket: &str, key: &str, body: &[u8], content_type: Option<&str>) {
        self.objects.lock().expect("poisoned mutex").insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                key: key.to_string(),
                body: body.to_vec(),
                content_type: content_type.map(str::to_string),
                size: Some(body.len() as u64),
                last_modified: Some(fixed_time()),
                e_tag: Some(format!("\"etag-{key}\"")),
            },
        );
    }

    pub(crate) fn fail_put_for(&self, key: &str) {
        self.failing_puts
            .lock()
            .expect("poisoned mutex")
            .insert(key.to_string());
    }

    pub(crate) fn deny_access(&self) {
        *self.access_denied.lock().expect("poisoned mutex") = true;
    }

    pub(crate) fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }

    fn check_access(&self, location: String) -> Result<(), StoreError> {
        if *self.access_denied.lock().expect("poisoned mutex") {
            return Err(StoreError::AccessDenied {
                location,
                message: "simulated access denial".to_string(),
            });
        }
        Ok(())
    }
}

impl ObjectStore for InMemoryStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        self.record_call(format!("get {bucket}/{key}"));
        self.check_access(object_location(bucket, key))?;
        self.object(bucket, key).ok_or_else(|| StoreError::NotFound {
            location: object_location(bucket, key),
            message: "The specified key does not exist.".to_string(),
        })
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.record_call(format!("put {bucket}/{key}"));
        self.check_access(object_location(bucket, key))?;
        if self.failing_puts.lock().expect("poisoned mutex").contains(key) {
            return Err(StoreError::Service {
                operation: "put_object",
                location: object_location(bucket, key),
                message: "simulated write failure".to_string(),
            });
        }

        self.objects.lock().expect("poisoned mutex").insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                key: key.to_string(),
                size: Some(body.len() as u64),
                body,
                content_type: Some(content_type.to_string()),
                last_modified: Some(fixed_time()),
                e_tag: None,
            },
        );
        Ok(())
    }

    fn list_objects(
        &self,
        bucket: &str,
        max_keys: usize,
    ) -> Result<Vec<ObjectSummary>, StoreError> {
        self.record_call(format!("list {bucket}"));
        self.check_access(bucket_location(bucket))?;
        Ok(self
            .objects
            .lock()
            .expect("poisoned mutex")
            .iter()
            .filter(|((object_bucket, _), _)| object_bucket == bucket)
            .take(max_keys)
            .map(|(_, object)| ObjectSummary {
                key: object.key.clone(),
                size: object.size,
                last_modified: object.last_modified,
                e_tag: object.e_tag.clone(),
            })
            .collect())
    }
}

pub(crate) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0)
        .single()
        .expect("fixed time should be valid")
}
