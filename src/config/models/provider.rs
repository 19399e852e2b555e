//! Provider configuration

use super::*;
use crate::config::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Provider configuration
///
/// One entry per configured backend. Published inside an immutable registry
/// snapshot; a change always produces a new snapshot rather than mutating this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique provider id (e.g. "openrouter-primary")
    pub id: String,
    /// Human readable name
    #[serde(default)]
    pub display_name: String,
    /// Backend type (openrouter, openai, anthropic, gemini, or a registered custom backend)
    pub provider_type: String,
    /// Lower values are tried first
    #[serde(default)]
    pub priority: i32,
    /// API key; when empty, `api_key_env` (or `<TYPE>_API_KEY`) is consulted
    #[serde(default)]
    pub api_key: String,
    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Model identifier sent to the backend
    pub model: String,
    /// Base endpoint; each backend type has its own default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Whether provider is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
    /// Consecutive transient failures before the circuit opens
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Base cooldown in milliseconds for exponential backoff
    #[serde(default = "default_base_cooldown_ms")]
    pub base_cooldown_ms: u64,
    /// Cooldown cap in milliseconds
    #[serde(default = "default_max_cooldown_ms")]
    pub max_cooldown_ms: u64,
    /// Extra HTTP headers sent with every call
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Provider-specific settings (e.g. OpenRouter `site_url`, `site_name`)
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            display_name: String::new(),
            provider_type: String::new(),
            priority: 0,
            api_key: String::new(),
            api_key_env: None,
            model: String::new(),
            base_url: None,
            enabled: true,
            timeout_ms: default_provider_timeout_ms(),
            failure_threshold: default_failure_threshold(),
            base_cooldown_ms: default_base_cooldown_ms(),
            max_cooldown_ms: default_max_cooldown_ms(),
            headers: HashMap::new(),
            settings: HashMap::new(),
        }
    }
}

impl ProviderConfig {
    pub fn new(
        id: impl Into<String>,
        provider_type: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            provider_type: provider_type.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_cooldown(mut self, base: Duration, max: Duration) -> Self {
        self.base_cooldown_ms = base.as_millis() as u64;
        self.max_cooldown_ms = max.as_millis() as u64;
        self
    }

    pub fn with_setting(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.settings.insert(key.to_string(), value.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn base_cooldown(&self) -> Duration {
        Duration::from_millis(self.base_cooldown_ms)
    }

    pub fn max_cooldown(&self) -> Duration {
        Duration::from_millis(self.max_cooldown_ms)
    }

    /// Resolve the credential, consulting the environment when the key is not inline
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.trim().to_string());
        }
        let var = self
            .api_key_env
            .clone()
            .unwrap_or_else(|| format!("{}_API_KEY", self.provider_type.to_uppercase()));
        std::env::var(var)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// String setting lookup
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Provider id cannot be empty".to_string());
        }
        if self.provider_type.trim().is_empty() {
            return Err(format!("Provider {} has no provider_type", self.id));
        }
        if self.model.trim().is_empty() {
            return Err(format!("Provider {} has no model", self.id));
        }
        if self.timeout_ms == 0 {
            return Err(format!("Provider {} timeout must be greater than 0", self.id));
        }
        if self.failure_threshold == 0 {
            return Err(format!(
                "Provider {} failure_threshold must be greater than 0",
                self.id
            ));
        }
        if self.max_cooldown_ms < self.base_cooldown_ms {
            return Err(format!(
                "Provider {} max_cooldown_ms must be >= base_cooldown_ms",
                self.id
            ));
        }
        if let Some(base_url) = &self.base_url {
            url::Url::parse(base_url)
                .map_err(|e| format!("Provider {} has invalid base_url: {}", self.id, e))?;
        }
        Ok(())
    }
}
