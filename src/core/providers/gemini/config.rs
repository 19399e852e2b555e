//! Gemini Provider Configuration

use crate::config::ProviderConfig;
use crate::core::providers::base::BaseConfig;
use crate::core::providers::unified_provider::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Gemini provider configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub base: BaseConfig,
    /// API version path segment
    pub api_version: String,
}

impl GeminiConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            base: BaseConfig::resolve(config, DEFAULT_BASE_URL)?,
            api_version: config
                .setting_str("api_version")
                .unwrap_or(DEFAULT_API_VERSION)
                .to_string(),
        })
    }

    pub fn generate_url(&self, model: &str) -> String {
        let model = model.trim_start_matches("models/");
        self.base.endpoint(&format!(
            "{}/models/{}:generateContent",
            self.api_version, model
        ))
    }
}
