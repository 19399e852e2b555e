//! Unified Provider Error Handling
//!
//! Single classified error type for all adapters.
//!
//! Every backend-specific failure (HTTP status, transport error, malformed body,
//! missing credentials) is converted into one [`ProviderError`] inside the adapter.
//! The orchestrator only ever reasons about the [`ErrorCategory`].
//!
//! | Variant | Category | Typical source | Circuit effect |
//! |---------|----------|----------------|----------------|
//! | Configuration | ConfigError | missing/invalid credentials | permanent disable |
//! | Authentication | AuthError | HTTP 401/403 | permanent disable |
//! | RateLimit | RateLimited | HTTP 429 | immediate cooldown, no strike |
//! | Timeout | Timeout | deadline exceeded | strike |
//! | InvalidResponse | InvalidResponse | non-2xx, malformed body | strike |
//! | Unavailable | Unavailable | connection refused, DNS | strike |
//!
//! ## Usage
//!
//! ```rust
//! use applytrack_ai::core::providers::{ErrorCategory, ProviderError};
//!
//! let err = ProviderError::rate_limit("openai", Some(30));
//! assert_eq!(err.category(), ErrorCategory::RateLimited);
//! assert_eq!(err.retry_after().map(|d| d.as_secs()), Some(30));
//! ```

use serde::Serialize;
use std::time::Duration;

/// Canonical failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCategory {
    ConfigError,
    AuthError,
    RateLimited,
    Timeout,
    InvalidResponse,
    Unavailable,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ConfigError => "config_error",
            ErrorCategory::AuthError => "auth_error",
            ErrorCategory::RateLimited => "rate_limited",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::InvalidResponse => "invalid_response",
            ErrorCategory::Unavailable => "unavailable",
        }
    }

    /// Failures that can never heal on their own during this process lifetime
    pub fn is_permanent(&self) -> bool {
        matches!(self, ErrorCategory::ConfigError | ErrorCategory::AuthError)
    }

    /// Failures that count toward the consecutive-failure threshold
    pub fn counts_toward_circuit(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Timeout | ErrorCategory::InvalidResponse | ErrorCategory::Unavailable
        )
    }

    /// Failures for which a bounded retry against the same provider is allowed
    pub fn allows_same_provider_retry(&self) -> bool {
        matches!(self, ErrorCategory::Timeout | ErrorCategory::InvalidResponse)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified provider error type - single classified error for all adapters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Configuration error for {provider}: {message}")]
    Configuration { provider: String, message: String },

    #[error("Authentication failed for {provider}: {message}")]
    Authentication { provider: String, message: String },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: String,
        message: String,
        /// Provider-advertised wait, in seconds
        retry_after: Option<u64>,
    },

    #[error("Timeout for {provider}: {message}")]
    Timeout { provider: String, message: String },

    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        provider: String,
        message: String,
        /// HTTP status when the failure came from a non-2xx reply
        status: Option<u16>,
    },

    #[error("Provider {provider} is unavailable: {message}")]
    Unavailable { provider: String, message: String },
}

impl ProviderError {
    /// Create configuration error
    pub fn configuration(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create authentication error
    pub fn authentication(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create rate limit error
    pub fn rate_limit(provider: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            provider: provider.into(),
            message: match retry_after {
                Some(seconds) => format!("Rate limit exceeded. Retry after {} seconds", seconds),
                None => "Rate limit exceeded".to_string(),
            },
            retry_after,
        }
    }

    /// Create timeout error
    pub fn timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create invalid response error for a malformed or incomplete body
    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create invalid response error for an unexpected HTTP status
    pub fn http_status(provider: impl Into<String>, status: u16, body: &str) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: format!("HTTP {}: {}", status, truncate(body, 512)),
            status: Some(status),
        }
    }

    /// Create unavailable error
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::ConfigError,
            Self::Authentication { .. } => ErrorCategory::AuthError,
            Self::RateLimit { .. } => ErrorCategory::RateLimited,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::InvalidResponse { .. } => ErrorCategory::InvalidResponse,
            Self::Unavailable { .. } => ErrorCategory::Unavailable,
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            Self::Configuration { provider, .. }
            | Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::InvalidResponse { provider, .. }
            | Self::Unavailable { provider, .. } => provider,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Configuration { message, .. }
            | Self::Authentication { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Timeout { message, .. }
            | Self::InvalidResponse { message, .. }
            | Self::Unavailable { message, .. } => message,
        }
    }

    /// Failures that count toward the circuit breaker
    pub fn is_transient(&self) -> bool {
        self.category().counts_toward_circuit()
    }

    /// Provider-advertised cooldown for rate limits
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after, .. } => retry_after.map(Duration::from_secs),
            _ => None,
        }
    }

    /// Re-attribute the error to a configured provider id
    ///
    /// Shared helpers classify errors before they know which configured entry
    /// they serve; the orchestrator stamps the id it dispatched to.
    pub fn with_provider(mut self, id: &str) -> Self {
        match &mut self {
            Self::Configuration { provider, .. }
            | Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::InvalidResponse { provider, .. }
            | Self::Unavailable { provider, .. } => *provider = id.to_string(),
        }
        self
    }
}

impl Serialize for ProviderError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ProviderError", 3)?;
        state.serialize_field("provider", self.provider())?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
