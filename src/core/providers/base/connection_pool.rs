use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Serialize;

use super::error_mapping::{map_reqwest_error, map_status};
use crate::core::providers::unified_provider::ProviderError;

/// Header name/value pair
pub type HeaderPair = (String, String);

/// Build a header pair
pub fn header(name: impl Into<String>, value: impl Into<String>) -> HeaderPair {
    (name.into(), value.into())
}

/// Unified connection pool configuration
pub struct PoolConfig;
impl PoolConfig {
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const POOL_SIZE: usize = 32;
    pub const KEEPALIVE_SECS: u64 = 90;
}

/// Successful (2xx) JSON reply
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: serde_json::Value,
    pub request_id: Option<String>,
}

/// Shared HTTP client for every adapter
///
/// Per-attempt deadlines are set on each request; the client itself only
/// bounds connection establishment.
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    client: Arc<Client>,
}

impl ConnectionPool {
    /// Create a new connection pool
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(PoolConfig::CONNECT_TIMEOUT_SECS))
            .pool_idle_timeout(Duration::from_secs(PoolConfig::KEEPALIVE_SECS))
            .pool_max_idle_per_host(PoolConfig::POOL_SIZE)
            .build()
            .map_err(|e| ProviderError::configuration("http-client", e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Get the underlying reqwest client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// POST a JSON body and classify the outcome
    ///
    /// Exactly one network call; never retries.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        provider: &str,
        url: &str,
        headers: Vec<HeaderPair>,
        body: &B,
        timeout: Duration,
    ) -> Result<HttpReply, ProviderError> {
        let mut request_builder = self.client.post(url).timeout(timeout).json(body);
        for (key, value) in headers {
            request_builder = request_builder.header(key, value);
        }

        let response = request_builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(provider, &e))?;

        let status = response.status().as_u16();
        let request_id = request_id_from(response.headers());

        if !response.status().is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let text = response.text().await.unwrap_or_default();
            return Err(map_status(provider, status, &text, retry_after.as_deref()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(provider, &e))?;
        let body = serde_json::from_slice(&bytes).map_err(|e| {
            ProviderError::invalid_response(provider, format!("unparsable JSON body: {}", e))
        })?;

        Ok(HttpReply {
            status,
            body,
            request_id,
        })
    }
}

fn request_id_from(headers: &HeaderMap) -> Option<String> {
    ["x-request-id", "request-id", "x-goog-request-id"]
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
