/*
[INPUT]:  HTTP configuration (project URL, API key, timeouts)
[OUTPUT]: Configured reqwest client ready for REST and Storage calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use std::time::Duration;

use crate::http::{AdapterError, Result};
use crate::types::ApiErrorBody;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for a Supabase project (PostgREST + Storage)
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http_client: Client,
    base_url: Url,
}

impl SupabaseClient {
    /// Create a new client with default configuration
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), base_url, api_key)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, base_url: &str, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AdapterError::Config("api key must not be empty".to_string()));
        }

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AdapterError::Config(format!(
                "base url cannot carry a path: {base_url}"
            )));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(auth_headers(api_key)?)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Build a URL below the project root, percent-encoding each segment
    pub(crate) fn endpoint<I, S>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AdapterError::Config(format!("base url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build request builder for an endpoint
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client.request(method, url)
    }

    /// Send a request and turn non-2xx responses into `AdapterError::Api`
    pub(crate) async fn send_checked(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(ApiErrorBody::into_message)
            .unwrap_or(body);
        tracing::debug!(status = status.as_u16(), %message, "supabase request rejected");
        Err(AdapterError::api_error(status, message))
    }
}

fn auth_headers(api_key: &str) -> Result<HeaderMap> {
    let invalid = |_| AdapterError::Config("api key contains invalid header characters".to_string());

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(api_key).map_err(invalid)?);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(invalid)?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}
