//! OpenRouter Provider Configuration

use crate::config::ProviderConfig;
use crate::core::providers::base::BaseConfig;
use crate::core::providers::unified_provider::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenRouter provider configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRouterConfig {
    pub base: BaseConfig,
    /// Site URL for OpenRouter (optional), sent as `HTTP-Referer`
    pub site_url: Option<String>,
    /// Site Name for OpenRouter (optional), sent as `X-Title`
    pub site_name: Option<String>,
}

impl OpenRouterConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            base: BaseConfig::resolve(config, DEFAULT_BASE_URL)?,
            site_url: config.setting_str("site_url").map(str::to_string),
            site_name: config.setting_str("site_name").map(str::to_string),
        })
    }

    pub fn chat_url(&self) -> String {
        self.base.endpoint("chat/completions")
    }
}
