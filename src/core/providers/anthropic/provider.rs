//! Anthropic Provider Implementation

use async_trait::async_trait;
use std::time::Duration;

use super::config::AnthropicConfig;
use super::models::AnthropicMessagesRequest;
use crate::config::ProviderConfig;
use crate::core::providers::base::{ConnectionPool, HeaderPair, header};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::ProviderAdapter;
use crate::core::types::{AIRequest, RawPayload, RawSuccess};

/// Anthropic provider implementation
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    config: AnthropicConfig,
    pool: ConnectionPool,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, pool: ConnectionPool) -> Result<Self, ProviderError> {
        Ok(Self {
            config: AnthropicConfig::from_provider_config(config)?,
            pool,
        })
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    fn request_headers(&self) -> Vec<HeaderPair> {
        let mut headers = vec![
            header("x-api-key", self.config.base.api_key.clone()),
            header("anthropic-version", self.config.api_version.clone()),
        ];
        for (key, value) in &self.config.base.headers {
            headers.push(header(key.clone(), value.clone()));
        }
        headers
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn attempt(
        &self,
        request: &AIRequest,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<RawSuccess, ProviderError> {
        let body = AnthropicMessagesRequest::from_request(request, &config.model);
        let reply = self
            .pool
            .post_json(
                &config.id,
                &self.config.messages_url(),
                self.request_headers(),
                &body,
                timeout,
            )
            .await?;

        Ok(RawSuccess::new(RawPayload::Anthropic(reply.body))
            .with_status(reply.status)
            .with_request_id(reply.request_id))
    }
}
