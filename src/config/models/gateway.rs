//! Main gateway configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Backends discovered from the environment, in priority order: (type, default model)
const ENV_PROVIDERS: [(&str, &str); 4] = [
    ("openrouter", "openai/gpt-4o-mini"),
    ("openai", "gpt-4o-mini"),
    ("anthropic", "claude-3-5-haiku-latest"),
    ("gemini", "gemini-1.5-flash"),
];

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Orchestrator configuration
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Provider configurations
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl GatewayConfig {
    /// Build a configuration from environment variables
    ///
    /// Every backend with `<TYPE>_API_KEY` set becomes a provider; `<TYPE>_MODEL`
    /// overrides the default model. `HOST` and `PORT` override the server address.
    pub fn from_env() -> crate::utils::error::Result<Self> {
        let mut server = ServerConfig::default();
        if let Ok(host) = std::env::var("HOST") {
            server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            server.port = port.parse().map_err(|_| {
                crate::utils::error::GatewayError::Config(format!("Invalid PORT: {}", port))
            })?;
        }

        let providers = ENV_PROVIDERS
            .iter()
            .enumerate()
            .filter_map(|(index, (provider_type, default_model))| {
                let upper = provider_type.to_uppercase();
                let api_key = std::env::var(format!("{}_API_KEY", upper)).ok()?;
                let model = std::env::var(format!("{}_MODEL", upper))
                    .unwrap_or_else(|_| default_model.to_string());
                let mut config = ProviderConfig::new(*provider_type, *provider_type, model)
                    .with_priority(index as i32)
                    .with_api_key(api_key);
                if *provider_type == "openrouter" {
                    if let Ok(site_url) = std::env::var("OPENROUTER_SITE_URL") {
                        config = config.with_setting("site_url", site_url);
                    }
                    if let Ok(site_name) = std::env::var("OPENROUTER_SITE_NAME") {
                        config = config.with_setting("site_name", site_name);
                    }
                }
                Some(config)
            })
            .collect();

        Ok(Self {
            server,
            orchestrator: OrchestratorConfig::default(),
            providers,
        })
    }
}
