//! OpenRouter Provider Implementation

use async_trait::async_trait;
use std::time::Duration;

use super::config::OpenRouterConfig;
use crate::config::ProviderConfig;
use crate::core::providers::base::{ConnectionPool, HeaderPair, header};
use crate::core::providers::openai::OpenAIChatRequest;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::ProviderAdapter;
use crate::core::types::{AIRequest, RawPayload, RawSuccess};

/// OpenRouter provider implementation
#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    config: OpenRouterConfig,
    pool: ConnectionPool,
}

impl OpenRouterProvider {
    pub fn new(config: &ProviderConfig, pool: ConnectionPool) -> Result<Self, ProviderError> {
        Ok(Self {
            config: OpenRouterConfig::from_provider_config(config)?,
            pool,
        })
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// Generate headers for OpenRouter API requests
    fn request_headers(&self) -> Vec<HeaderPair> {
        let mut headers = Vec::with_capacity(3 + self.config.base.headers.len());

        headers.push(header(
            "Authorization",
            format!("Bearer {}", self.config.base.api_key),
        ));

        if let Some(site_url) = &self.config.site_url {
            headers.push(header("HTTP-Referer", site_url.clone()));
        }

        if let Some(site_name) = &self.config.site_name {
            headers.push(header("X-Title", site_name.clone()));
        }

        for (key, value) in &self.config.base.headers {
            headers.push(header(key.clone(), value.clone()));
        }

        headers
    }
}

#[async_trait]
impl ProviderAdapter for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    async fn attempt(
        &self,
        request: &AIRequest,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<RawSuccess, ProviderError> {
        let body = OpenAIChatRequest::from_request(request, &config.model);
        let reply = self
            .pool
            .post_json(
                &config.id,
                &self.config.chat_url(),
                self.request_headers(),
                &body,
                timeout,
            )
            .await?;

        Ok(RawSuccess::new(RawPayload::OpenRouter(reply.body))
            .with_status(reply.status)
            .with_request_id(reply.request_id))
    }
}
