//! Configuration management for the Gateway
//!
//! This module handles loading, validation, and hot reload of the gateway configuration.

pub mod loader;
pub mod models;
pub mod validation;
pub mod watcher;

pub use models::*;
pub use validation::Validate;
pub use watcher::{ConfigWatcher, WatchHandle};

use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the Gateway
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let gateway = loader::load_file(path).await?;
        let config = Self { gateway };

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let gateway = GatewayConfig::from_env()?;
        let config = Self { gateway };

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise from the environment
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::from_file(path).await,
            Some(path) => {
                info!(
                    "Configuration file {:?} not found, falling back to environment",
                    path
                );
                Self::from_env()
            }
            None => Self::from_env(),
        }
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    /// Get providers configuration
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.gateway.providers
    }

    /// Get orchestrator settings
    pub fn orchestrator(&self) -> &OrchestratorConfig {
        &self.gateway.orchestrator
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.gateway.validate().map_err(GatewayError::Config)
    }
}
