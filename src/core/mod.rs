//! Core functionality for the Gateway
//!
//! This module contains the provider adapters, the fallback orchestrator and
//! the canonical request/response types.

pub mod providers;
pub mod router;
pub mod traits;
pub mod types;

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{Config, ConfigWatcher, WatchHandle};
use crate::core::providers::ProviderRegistry;
use crate::core::router::{HealthTracker, Orchestrator};
use crate::utils::error::Result;

/// Main Gateway struct that wires all components together
#[derive(Debug, Clone)]
pub struct Gateway {
    /// Gateway configuration
    config: Arc<Config>,
    /// Hot-swappable provider registry
    registry: Arc<ProviderRegistry>,
    /// Shared per-provider circuit state
    health: Arc<HealthTracker>,
    /// Fallback dispatcher
    orchestrator: Arc<Orchestrator>,
}

impl Gateway {
    /// Create a new Gateway instance
    ///
    /// Invalid provider entries are rejected individually and do not fail startup.
    pub fn new(config: Config) -> Result<Self> {
        let registry = ProviderRegistry::new(config.orchestrator().worker_pool_size)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a Gateway around a registry that already has custom backends
    /// registered; the configured providers are published into it
    pub fn with_registry(config: Config, registry: ProviderRegistry) -> Self {
        info!("Initializing Gateway");

        let report = registry.reload(config.providers());
        if report.rejected.len() == config.providers().len() && !config.providers().is_empty() {
            warn!("Every configured provider was rejected; all AI requests will fail");
        } else if config.providers().is_empty() {
            warn!("No providers configured; all AI requests will fail");
        }

        let registry = Arc::new(registry);
        let health = Arc::new(HealthTracker::new());
        let orchestrator = Arc::new(Orchestrator::new(
            registry.clone(),
            health.clone(),
            config.orchestrator().clone(),
        ));

        info!(
            providers = registry.snapshot().len(),
            "Gateway initialized successfully"
        );

        Self {
            config: Arc::new(config),
            registry,
            health,
            orchestrator,
        }
    }

    /// Watch `path` and republish the registry when it changes
    pub fn watch_config(&self, path: &Path) -> Result<WatchHandle> {
        ConfigWatcher::new(path, self.registry.clone(), self.health.clone()).start()
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn health(&self) -> &Arc<HealthTracker> {
        &self.health
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }
}
