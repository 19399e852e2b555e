//! OpenAI Provider Configuration

use crate::config::ProviderConfig;
use crate::core::providers::base::BaseConfig;
use crate::core::providers::unified_provider::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    pub base: BaseConfig,
    /// Optional `OpenAI-Organization` header
    pub organization: Option<String>,
}

impl OpenAIConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            base: BaseConfig::resolve(config, DEFAULT_BASE_URL)?,
            organization: config.setting_str("organization").map(str::to_string),
        })
    }

    pub fn chat_url(&self) -> String {
        self.base.endpoint("chat/completions")
    }
}
