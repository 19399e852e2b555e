//! Gemini Provider Implementation

use async_trait::async_trait;
use std::time::Duration;

use super::config::GeminiConfig;
use super::models::GeminiGenerateRequest;
use crate::config::ProviderConfig;
use crate::core::providers::base::{ConnectionPool, HeaderPair, header};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::ProviderAdapter;
use crate::core::types::{AIRequest, RawPayload, RawSuccess};

/// Gemini provider implementation
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    config: GeminiConfig,
    pool: ConnectionPool,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, pool: ConnectionPool) -> Result<Self, ProviderError> {
        Ok(Self {
            config: GeminiConfig::from_provider_config(config)?,
            pool,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    // Key goes in a header rather than the `key=` query parameter so it never
    // shows up in URL logs.
    fn request_headers(&self) -> Vec<HeaderPair> {
        let mut headers = vec![header("x-goog-api-key", self.config.base.api_key.clone())];
        for (key, value) in &self.config.base.headers {
            headers.push(header(key.clone(), value.clone()));
        }
        headers
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn attempt(
        &self,
        request: &AIRequest,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<RawSuccess, ProviderError> {
        let body = GeminiGenerateRequest::from_request(request);
        let reply = self
            .pool
            .post_json(
                &config.id,
                &self.config.generate_url(&config.model),
                self.request_headers(),
                &body,
                timeout,
            )
            .await?;

        Ok(RawSuccess::new(RawPayload::Gemini(reply.body))
            .with_status(reply.status)
            .with_request_id(reply.request_id))
    }
}
