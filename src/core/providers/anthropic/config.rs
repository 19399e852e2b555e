//! Anthropic Provider Configuration

use crate::config::ProviderConfig;
use crate::core::providers::base::BaseConfig;
use crate::core::providers::unified_provider::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Anthropic provider configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnthropicConfig {
    pub base: BaseConfig,
    /// Value of the `anthropic-version` header
    pub api_version: String,
}

impl AnthropicConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            base: BaseConfig::resolve(config, DEFAULT_BASE_URL)?,
            api_version: config
                .setting_str("api_version")
                .unwrap_or(DEFAULT_API_VERSION)
                .to_string(),
        })
    }

    pub fn messages_url(&self) -> String {
        self.base.endpoint("v1/messages")
    }
}
