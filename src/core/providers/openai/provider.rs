//! OpenAI Provider Implementation

use async_trait::async_trait;
use std::time::Duration;

use super::config::OpenAIConfig;
use super::models::OpenAIChatRequest;
use crate::config::ProviderConfig;
use crate::core::providers::base::{ConnectionPool, HeaderPair, header};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::ProviderAdapter;
use crate::core::types::{AIRequest, RawPayload, RawSuccess};

/// OpenAI provider implementation
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    config: OpenAIConfig,
    pool: ConnectionPool,
}

impl OpenAIProvider {
    pub fn new(config: &ProviderConfig, pool: ConnectionPool) -> Result<Self, ProviderError> {
        Ok(Self {
            config: OpenAIConfig::from_provider_config(config)?,
            pool,
        })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn request_headers(&self) -> Vec<HeaderPair> {
        let mut headers = Vec::with_capacity(2 + self.config.base.headers.len());
        headers.push(header(
            "Authorization",
            format!("Bearer {}", self.config.base.api_key),
        ));
        if let Some(organization) = &self.config.organization {
            headers.push(header("OpenAI-Organization", organization.clone()));
        }
        for (key, value) in &self.config.base.headers {
            headers.push(header(key.clone(), value.clone()));
        }
        headers
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
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

        Ok(RawSuccess::new(RawPayload::OpenAIChat(reply.body))
            .with_status(reply.status)
            .with_request_id(reply.request_id))
    }
}
