//! Error types for the Gateway

use crate::core::providers::unified_provider::ProviderError;
use crate::core::router::DispatchError;
use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single classified provider failure
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Orchestrator could not serve the request
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// File watcher errors
    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }
}
