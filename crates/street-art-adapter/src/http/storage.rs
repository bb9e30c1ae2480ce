/*
[INPUT]:  Bucket names, object keys, and raw bytes
[OUTPUT]: Upload acknowledgements and public object URLs
[POS]:    HTTP layer - Storage object endpoints
[UPDATE]: When changing upload options or URL layout
*/

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use crate::http::{Result, SupabaseClient};
use crate::types::UploadResponse;

impl SupabaseClient {
    /// Upload an object without overwriting an existing key
    ///
    /// POST /storage/v1/object/{bucket}/{key}
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadResponse> {
        let url = self.endpoint(["storage", "v1", "object", bucket, key])?;
        let size = bytes.len();
        let builder = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        let response = self.send_checked(builder).await?;
        let uploaded: UploadResponse = response.json().await?;
        tracing::debug!(bucket, key, size, stored = %uploaded.key, "object uploaded");
        Ok(uploaded)
    }

    /// Public URL of an object in a public bucket
    ///
    /// {base}/storage/v1/object/public/{bucket}/{key}
    pub fn public_object_url(&self, bucket: &str, key: &str) -> Result<String> {
        let url = self.endpoint(["storage", "v1", "object", "public", bucket, key])?;
        Ok(url.to_string())
    }
}
