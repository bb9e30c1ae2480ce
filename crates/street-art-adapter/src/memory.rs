/*
[INPUT]:  Gateway calls from tests and offline sessions
[OUTPUT]: In-process table rows and stored objects with failure injection
[POS]:    Test/offline backend - implements both gateway traits
[UPDATE]: When gateway traits change or new failure modes are needed
*/

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::Value;

use crate::gateway::{BlobStoreGateway, PersistenceGateway};
use crate::http::{AdapterError, Result};
use crate::types::Filters;

const DEFAULT_PUBLIC_BASE: &str = "memory://storage";

/// Object kept by [`InMemoryGateway`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Value>>,
    objects: HashMap<(String, String), StoredObject>,
    failing_buckets: HashSet<String>,
    fail_inserts: bool,
    fail_queries: bool,
    query_delay: Option<Duration>,
    query_calls: usize,
    insert_calls: usize,
    upload_calls: usize,
}

/// Gateway backed by process memory.
///
/// Inserted rows get a fresh `id` when they carry none. Uploads refuse to
/// overwrite an existing key, like Storage with `x-upsert: false`.
#[derive(Debug)]
pub struct InMemoryGateway {
    public_base: String,
    state: Mutex<MemoryState>,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::with_public_base(DEFAULT_PUBLIC_BASE)
    }

    /// Use `base` as the prefix of resolved public URLs
    pub fn with_public_base(base: impl Into<String>) -> Self {
        Self {
            public_base: base.into().trim_end_matches('/').to_string(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Pre-populate a table row without counting it as an insert
    pub fn seed(&self, table: &str, row: Value) {
        self.state()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.state()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn object_keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .state()
            .objects
            .keys()
            .filter(|(stored_bucket, _)| stored_bucket == bucket)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Reject every upload into `bucket`
    pub fn fail_uploads_to(&self, bucket: &str) {
        self.state().failing_buckets.insert(bucket.to_string());
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.state().fail_inserts = fail;
    }

    pub fn set_fail_queries(&self, fail: bool) {
        self.state().fail_queries = fail;
    }

    /// Delay every query answer, to exercise slow or overtaken lookups
    pub fn set_query_delay(&self, delay: Option<Duration>) {
        self.state().query_delay = delay;
    }

    pub fn query_calls(&self) -> usize {
        self.state().query_calls
    }

    pub fn insert_calls(&self) -> usize {
        self.state().insert_calls
    }

    pub fn upload_calls(&self) -> usize {
        self.state().upload_calls
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn query(&self, table: &str, columns: &[&str], filters: &Filters) -> Result<Vec<Value>> {
        let delay = {
            let mut state = self.state();
            state.query_calls += 1;
            state.query_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        if state.fail_queries {
            return Err(AdapterError::api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "query rejected",
            ));
        }
        Ok(state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filters.matches(row))
                    .map(|row| project(row, columns))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, mut record: Value) -> Result<()> {
        let mut state = self.state();
        state.insert_calls += 1;
        if state.fail_inserts {
            return Err(AdapterError::api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "insert rejected",
            ));
        }

        let Value::Object(fields) = &mut record else {
            return Err(AdapterError::api_error(
                StatusCode::BAD_REQUEST,
                "record must be a JSON object",
            ));
        };
        fields
            .entry("id")
            .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));

        state.tables.entry(table.to_string()).or_default().push(record);
        Ok(())
    }
}

#[async_trait]
impl BlobStoreGateway for InMemoryGateway {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let mut state = self.state();
        state.upload_calls += 1;
        if state.failing_buckets.contains(bucket) {
            return Err(AdapterError::api_error(
                StatusCode::BAD_REQUEST,
                format!("bucket {bucket} rejected the upload"),
            ));
        }

        let slot = (bucket.to_string(), key.to_string());
        if state.objects.contains_key(&slot) {
            return Err(AdapterError::api_error(
                StatusCode::CONFLICT,
                "The resource already exists",
            ));
        }
        state.objects.insert(
            slot,
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                uploaded_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> Result<String> {
        Ok(format!("{}/{bucket}/{key}", self.public_base))
    }
}

fn project(row: &Value, columns: &[&str]) -> Value {
    if columns.is_empty() {
        return row.clone();
    }
    let picked = columns
        .iter()
        .filter_map(|column| row.get(*column).map(|value| (column.to_string(), value.clone())))
        .collect();
    Value::Object(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_query_filters() {
        let gateway = InMemoryGateway::new();
        gateway
            .insert("submissions", json!({ "artistName": "Banksy", "artistEmail": "b@x.io" }))
            .await
            .expect("insert");
        gateway
            .insert("submissions", json!({ "artistName": "Invader", "artistEmail": "i@x.io" }))
            .await
            .expect("insert");

        let rows = gateway
            .query("submissions", &[], &Filters::new().eq("artistName", "Banksy"))
            .await
            .expect("query");
        assert_eq!(rows.len(), 1);
        assert!(rows[0]["id"].is_string());

        let rows = gateway
            .query("submissions", &["artistName"], &Filters::new().eq("artistName", "Banksy"))
            .await
            .expect("projected query");
        assert_eq!(rows, vec![json!({ "artistName": "Banksy" })]);
        assert_eq!(gateway.insert_calls(), 2);
        assert_eq!(gateway.query_calls(), 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_non_object() {
        let gateway = InMemoryGateway::new();
        let err = gateway.insert("submissions", json!([1, 2])).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(gateway.rows("submissions").is_empty());
    }

    #[tokio::test]
    async fn test_upload_refuses_overwrite() {
        let gateway = InMemoryGateway::new();
        gateway
            .upload("artist-photos", "1_me.png", vec![1], "image/png")
            .await
            .expect("first upload");
        let err = gateway
            .upload("artist-photos", "1_me.png", vec![2], "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Api { status: 409, .. }));
        assert_eq!(
            gateway.object("artist-photos", "1_me.png").map(|object| object.bytes),
            Some(vec![1])
        );
    }

    #[tokio::test]
    async fn test_failing_bucket_and_public_url() {
        let gateway = InMemoryGateway::with_public_base("https://cdn.example/");
        gateway.fail_uploads_to("artwork-images");
        assert!(
            gateway
                .upload("artwork-images", "1_a.jpg", vec![1], "image/jpeg")
                .await
                .is_err()
        );
        assert_eq!(
            gateway.public_url("artist-photos", "1_me.png").expect("url"),
            "https://cdn.example/artist-photos/1_me.png"
        );
        assert_eq!(gateway.upload_calls(), 1);
    }
}
