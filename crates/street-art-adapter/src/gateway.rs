/*
[INPUT]:  Table rows, filters, and binary objects from the wizard
[OUTPUT]: Gateway traits decoupling the wizard from Supabase
[POS]:    Abstraction layer - persistence and blob store capabilities
[UPDATE]: When the wizard needs a new backend capability
*/

use async_trait::async_trait;
use serde_json::Value;

use crate::http::{Result, SupabaseClient};
use crate::types::Filters;

/// Record store supporting exact-match queries and inserts
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// `columns` of the rows of `table` matching every filter. An empty
    /// column list selects every column.
    async fn query(&self, table: &str, columns: &[&str], filters: &Filters) -> Result<Vec<Value>>;

    /// Insert one record into `table`
    async fn insert(&self, table: &str, record: Value) -> Result<()>;
}

/// Binary object store with public URL resolution
#[async_trait]
pub trait BlobStoreGateway: Send + Sync {
    /// Store `bytes` under `bucket/key`
    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<()>;

    /// Public URL for `bucket/key`
    fn public_url(&self, bucket: &str, key: &str) -> Result<String>;
}

#[async_trait]
impl PersistenceGateway for SupabaseClient {
    async fn query(&self, table: &str, columns: &[&str], filters: &Filters) -> Result<Vec<Value>> {
        self.select_rows(table, columns, filters).await
    }

    async fn insert(&self, table: &str, record: Value) -> Result<()> {
        self.insert_row(table, &record).await
    }
}

#[async_trait]
impl BlobStoreGateway for SupabaseClient {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.upload_object(bucket, key, bytes, content_type).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> Result<String> {
        self.public_object_url(bucket, key)
    }
}
