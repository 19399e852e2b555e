//! AI Provider implementations using Rust-idiomatic enum-based design
//!
//! This module contains the unified [`Provider`] enum (one variant per backend
//! family), the HTTP adapters, the blocking-SDK adapter, the response
//! normalizer and the hot-swappable registry.

// Base infrastructure
pub mod base;

// Provider modules
pub mod anthropic;
pub mod blocking;
pub mod gemini;
pub mod openai;
pub mod openrouter;

// Registry, normalization and unified error
pub mod normalizer;
pub mod provider_registry;
pub mod unified_provider;

use std::sync::Arc;
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::core::traits::{ProviderAdapter, SyncBackend};
use crate::core::types::{AIRequest, RawSuccess};

pub use anthropic::AnthropicProvider;
pub use base::{ConnectionPool, WorkerHandle, WorkerPool};
pub use blocking::BlockingProvider;
pub use gemini::GeminiProvider;
pub use normalizer::normalize;
pub use openai::OpenAIProvider;
pub use openrouter::OpenRouterProvider;
pub use provider_registry::{
    ProviderRegistry, RegisteredProvider, RegistrySnapshot, ReloadReport,
};
pub use unified_provider::{ErrorCategory, ProviderError};

/// Provider type enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProviderType {
    OpenRouter,
    OpenAI,
    Anthropic,
    Gemini,
    Custom(String),
}

impl From<&str> for ProviderType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "openrouter" => ProviderType::OpenRouter,
            "openai" => ProviderType::OpenAI,
            "anthropic" | "claude" => ProviderType::Anthropic,
            "gemini" | "google" | "google-ai" => ProviderType::Gemini,
            _ => ProviderType::Custom(s.to_string()),
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::OpenRouter => write!(f, "openrouter"),
            ProviderType::OpenAI => write!(f, "openai"),
            ProviderType::Anthropic => write!(f, "anthropic"),
            ProviderType::Gemini => write!(f, "gemini"),
            ProviderType::Custom(name) => write!(f, "{}", name),
        }
    }
}

// ==================== Provider Dispatch Macros ====================

/// Macro for dispatching synchronous methods to all providers
macro_rules! dispatch_provider {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            Provider::OpenRouter(p) => p.$method($($arg),*),
            Provider::OpenAI(p) => p.$method($($arg),*),
            Provider::Anthropic(p) => p.$method($($arg),*),
            Provider::Gemini(p) => p.$method($($arg),*),
            Provider::Blocking(p) => p.$method($($arg),*),
            Provider::Custom(p) => p.$method($($arg),*),
        }
    };
}

/// Macro for dispatching async methods to all providers
macro_rules! dispatch_provider_async {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            Provider::OpenRouter(p) => p.$method($($arg),*).await,
            Provider::OpenAI(p) => p.$method($($arg),*).await,
            Provider::Anthropic(p) => p.$method($($arg),*).await,
            Provider::Gemini(p) => p.$method($($arg),*).await,
            Provider::Blocking(p) => p.$method($($arg),*).await,
            Provider::Custom(p) => p.$method($($arg),*).await,
        }
    };
}

/// Unified provider enum - one variant per backend family
#[derive(Debug, Clone)]
pub enum Provider {
    OpenRouter(OpenRouterProvider),
    OpenAI(OpenAIProvider),
    Anthropic(AnthropicProvider),
    Gemini(GeminiProvider),
    /// Synchronous SDK behind the bounded worker pool
    Blocking(BlockingProvider),
    /// Embedder-supplied async backend
    Custom(Arc<dyn ProviderAdapter>),
}

impl Provider {
    /// Build the adapter for a configured provider
    ///
    /// Missing credentials or an unknown backend type is a configuration error.
    pub fn from_config(
        config: &ProviderConfig,
        connections: &ConnectionPool,
    ) -> Result<Self, ProviderError> {
        let connections = connections.clone();
        match ProviderType::from(config.provider_type.as_str()) {
            ProviderType::OpenRouter => Ok(Provider::OpenRouter(OpenRouterProvider::new(
                config,
                connections,
            )?)),
            ProviderType::OpenAI => Ok(Provider::OpenAI(OpenAIProvider::new(config, connections)?)),
            ProviderType::Anthropic => Ok(Provider::Anthropic(AnthropicProvider::new(
                config,
                connections,
            )?)),
            ProviderType::Gemini => Ok(Provider::Gemini(GeminiProvider::new(config, connections)?)),
            ProviderType::Custom(name) => Err(ProviderError::configuration(
                &config.id,
                format!("unknown provider type '{}'", name),
            )),
        }
    }

    /// Wrap an async adapter
    pub fn custom(adapter: impl ProviderAdapter + 'static) -> Self {
        Provider::Custom(Arc::new(adapter))
    }

    /// Wrap a synchronous backend so it runs on `pool`
    pub fn blocking(backend: impl SyncBackend + 'static, pool: WorkerPool) -> Self {
        Provider::Blocking(BlockingProvider::new(Arc::new(backend), pool))
    }

    /// Backend family name
    pub fn name(&self) -> &'static str {
        dispatch_provider!(self, name)
    }

    pub fn provider_type(&self) -> ProviderType {
        match self {
            Provider::OpenRouter(_) => ProviderType::OpenRouter,
            Provider::OpenAI(_) => ProviderType::OpenAI,
            Provider::Anthropic(_) => ProviderType::Anthropic,
            Provider::Gemini(_) => ProviderType::Gemini,
            Provider::Blocking(_) | Provider::Custom(_) => {
                ProviderType::Custom(self.name().to_string())
            }
        }
    }

    /// Perform one attempt against the backend
    pub async fn attempt(
        &self,
        request: &AIRequest,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<RawSuccess, ProviderError> {
        dispatch_provider_async!(self, attempt, request, config, timeout)
    }
}
