//! Configuration
//!
//! Credentials and endpoint shared by the HTTP adapters, resolved from a
//! [`ProviderConfig`] once when the registry builds its snapshot.

use crate::config::ProviderConfig;
use crate::core::providers::unified_provider::ProviderError;
use crate::utils::logging::redact_key;
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::HashMap;
use std::fmt;

/// Resolved connection settings for one configured provider
#[derive(Clone, PartialEq)]
pub struct BaseConfig {
    /// API key
    pub api_key: String,

    /// Base URL without trailing slash
    pub api_base: String,

    /// Extra HTTP headers sent with every call
    pub headers: HashMap<String, String>,
}

impl fmt::Debug for BaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseConfig")
            .field("api_key", &redact_key(&self.api_key))
            .field("api_base", &self.api_base)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BaseConfig {
    /// Resolve credentials and endpoint, failing with a configuration error
    pub fn resolve(config: &ProviderConfig, default_base: &str) -> Result<Self, ProviderError> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            ProviderError::configuration(&config.id, "API key is missing or empty")
        })?;

        let api_base = config
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(default_base)
            .trim_end_matches('/')
            .to_string();

        if !api_base.starts_with("http") {
            return Err(ProviderError::configuration(
                &config.id,
                "base URL must start with http:// or https://",
            ));
        }

        // Values the HTTP client would refuse on every call
        if HeaderValue::from_str(&api_key).is_err() {
            return Err(ProviderError::configuration(
                &config.id,
                "API key contains characters not allowed in an HTTP header",
            ));
        }
        for (name, value) in &config.headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err()
                || HeaderValue::from_str(value).is_err()
            {
                return Err(ProviderError::configuration(
                    &config.id,
                    format!("invalid HTTP header '{}'", name),
                ));
            }
        }

        Ok(Self {
            api_key,
            api_base,
            headers: config.headers.clone(),
        })
    }

    /// Join the base URL with an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}
