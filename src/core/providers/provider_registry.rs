//! Provider Registry
//!
//! Holds the ordered list of configured providers as an immutable
//! [`RegistrySnapshot`] behind an `ArcSwap`. A dispatch loads the snapshot once
//! and keeps it for its whole lifetime; a reload publishes a new snapshot and
//! never touches one that is in use.

use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};

use super::base::{ConnectionPool, WorkerPool};
use super::unified_provider::ProviderError;
use super::{BlockingProvider, Provider};
use crate::config::{ProviderConfig, Validate};
use crate::core::traits::{ProviderAdapter, SyncBackend};
use crate::utils::logging::OPERATOR_TARGET;

/// A configured provider together with its adapter
#[derive(Debug, Clone)]
pub struct RegisteredProvider {
    pub config: Arc<ProviderConfig>,
    pub provider: Provider,
}

impl RegisteredProvider {
    pub fn id(&self) -> &str {
        &self.config.id
    }
}

/// Immutable, versioned view of the configured providers
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    pub version: u64,
    /// Enabled, valid providers ordered by priority (lower first, ties keep config order)
    pub entries: Vec<RegisteredProvider>,
    /// Ids of providers switched off with `enabled: false`
    pub disabled: Vec<String>,
    /// Entries rejected at build time, one `ConfigError` each
    pub rejected: Vec<ProviderError>,
}

impl RegistrySnapshot {
    /// Providers eligible for dispatch, in priority order
    pub fn eligible(&self) -> &[RegisteredProvider] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredProvider> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a reload changed, so health state can follow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    pub version: u64,
    pub added: Vec<String>,
    /// Ids whose configuration differs from the previous snapshot
    pub changed: Vec<String>,
    /// Ids no longer present (removed, disabled or now rejected)
    pub removed: Vec<String>,
    pub rejected: Vec<String>,
}

/// Provider Registry using enum-based providers
#[derive(Debug)]
pub struct ProviderRegistry {
    current: ArcSwap<RegistrySnapshot>,
    /// Embedder-supplied backends keyed by `provider_type`
    backends: DashMap<String, Provider>,
    connections: ConnectionPool,
    workers: WorkerPool,
    version: AtomicU64,
    reload_lock: Mutex<()>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new(worker_pool_size: usize) -> Result<Self, ProviderError> {
        Ok(Self {
            current: ArcSwap::from_pointee(RegistrySnapshot::default()),
            backends: DashMap::new(),
            connections: ConnectionPool::new()?,
            workers: WorkerPool::new(worker_pool_size),
            version: AtomicU64::new(0),
            reload_lock: Mutex::new(()),
        })
    }

    /// Create a registry and publish `configs` as the first snapshot
    pub fn with_configs(
        configs: &[ProviderConfig],
        worker_pool_size: usize,
    ) -> Result<Self, ProviderError> {
        let registry = Self::new(worker_pool_size)?;
        registry.reload(configs);
        Ok(registry)
    }

    /// Register a backend for configs whose `provider_type` equals `name`
    ///
    /// Takes precedence over the built-in adapter of the same name. Affects
    /// snapshots published after the call.
    pub fn register_backend(&self, name: impl Into<String>, provider: Provider) {
        let name = name.into().to_lowercase();
        info!(backend = %name, kind = provider.name(), "Registered custom backend");
        self.backends.insert(name, provider);
    }

    /// Register an async adapter
    pub fn register_adapter(&self, name: impl Into<String>, adapter: Arc<dyn ProviderAdapter>) {
        self.register_backend(name, Provider::Custom(adapter));
    }

    /// Register a synchronous SDK, run on the registry's worker pool
    pub fn register_blocking_backend(&self, name: impl Into<String>, backend: Arc<dyn SyncBackend>) {
        let provider = Provider::Blocking(BlockingProvider::new(backend, self.workers.clone()));
        self.register_backend(name, provider);
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.load_full()
    }

    pub fn version(&self) -> u64 {
        self.current.load().version
    }

    pub fn workers(&self) -> &WorkerPool {
        &self.workers
    }

    /// Build and publish a new snapshot from `configs`
    ///
    /// Invalid entries are rejected with a `ConfigError`, logged to the operator
    /// target and left out of the snapshot.
    pub fn reload(&self, configs: &[ProviderConfig]) -> ReloadReport {
        let _guard = self.reload_lock.lock();
        let previous = self.current.load_full();
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;

        let mut entries = Vec::with_capacity(configs.len());
        let mut disabled = Vec::new();
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();

        for config in configs {
            if !seen.insert(config.id.clone()) {
                rejected.push(ProviderError::configuration(
                    &config.id,
                    "duplicate provider id",
                ));
                continue;
            }
            if !config.enabled {
                disabled.push(config.id.clone());
                continue;
            }
            match self.build(config) {
                Ok(provider) => entries.push(RegisteredProvider {
                    config: Arc::new(config.clone()),
                    provider,
                }),
                Err(err) => rejected.push(err),
            }
        }

        entries.sort_by_key(|entry| entry.config.priority);

        for err in &rejected {
            error!(
                target: OPERATOR_TARGET,
                provider = %err.provider(),
                error = %err.message(),
                "Provider configuration rejected; provider excluded from dispatch"
            );
        }

        let report = diff(&previous, &entries, &rejected, version);

        info!(
            version,
            providers = entries.len(),
            rejected = rejected.len(),
            disabled = disabled.len(),
            "Published provider registry snapshot"
        );

        self.current.store(Arc::new(RegistrySnapshot {
            version,
            entries,
            disabled,
            rejected,
        }));

        report
    }

    fn build(&self, config: &ProviderConfig) -> Result<Provider, ProviderError> {
        config
            .validate()
            .map_err(|message| ProviderError::configuration(&config.id, message))?;

        if let Some(backend) = self.backends.get(&config.provider_type.to_lowercase()) {
            return Ok(backend.value().clone());
        }
        Provider::from_config(config, &self.connections)
    }
}

fn diff(
    previous: &RegistrySnapshot,
    entries: &[RegisteredProvider],
    rejected: &[ProviderError],
    version: u64,
) -> ReloadReport {
    let before: HashMap<&str, &ProviderConfig> = previous
        .entries
        .iter()
        .map(|e| (e.id(), e.config.as_ref()))
        .collect();
    let after: HashSet<&str> = entries.iter().map(|e| e.id()).collect();

    let mut report = ReloadReport {
        version,
        rejected: rejected.iter().map(|e| e.provider().to_string()).collect(),
        ..Default::default()
    };

    for entry in entries {
        match before.get(entry.id()) {
            None => report.added.push(entry.id().to_string()),
            Some(old) if **old != *entry.config => report.changed.push(entry.id().to_string()),
            Some(_) => {}
        }
    }
    for entry in &previous.entries {
        if !after.contains(entry.id()) {
            report.removed.push(entry.id().to_string());
        }
    }
    report
}
