//! Configuration hot reload
//!
//! Watches the configuration file and republishes the provider registry when it
//! changes. In-flight dispatches keep the snapshot they started with.

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::loader;
use super::validation::Validate;
use crate::core::providers::{ProviderRegistry, ReloadReport};
use crate::core::router::HealthTracker;
use crate::utils::error::{GatewayError, Result};

/// Reloads the provider registry from a configuration file
#[derive(Debug, Clone)]
pub struct ConfigWatcher {
    path: PathBuf,
    registry: Arc<ProviderRegistry>,
    health: Arc<HealthTracker>,
}

/// Keeps the file watch alive; dropping it stops reloading
#[derive(Debug)]
pub struct WatchHandle {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl ConfigWatcher {
    pub fn new(
        path: impl Into<PathBuf>,
        registry: Arc<ProviderRegistry>,
        health: Arc<HealthTracker>,
    ) -> Self {
        Self {
            path: path.into(),
            registry,
            health,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start watching; must be called inside a tokio runtime
    pub fn start(&self) -> Result<WatchHandle> {
        let (tx, mut rx) = mpsc::channel::<()>(1);
        let file_name = self.path.file_name().map(|name| name.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let Ok(event) = res else {
                    return;
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                let ours = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if ours {
                    // A reload is already queued when the channel is full
                    let _ = tx.try_send(());
                }
            },
            NotifyConfig::default(),
        )?;

        // Watch the directory so editors that replace the file are still seen
        let target = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !target.exists() {
            return Err(GatewayError::Config(format!(
                "Cannot watch missing directory {:?}",
                target
            )));
        }
        watcher.watch(&target, RecursiveMode::NonRecursive)?;
        info!("Watching configuration file: {:?}", self.path);

        let this = self.clone();
        let task = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                info!("Configuration change detected, reloading...");
                if let Err(e) = this.reload_now().await {
                    error!("Failed to reload configuration: {}", e);
                }
            }
        });

        Ok(WatchHandle {
            _watcher: watcher,
            task,
        })
    }

    /// Reparse the file and publish a new registry snapshot
    ///
    /// A file that fails to parse or validate leaves the current snapshot in place.
    pub async fn reload_now(&self) -> Result<ReloadReport> {
        let gateway = loader::load_file(&self.path).await?;
        gateway.validate().map_err(GatewayError::Config)?;

        let report = self.registry.reload(&gateway.providers);
        for id in report.changed.iter().chain(report.removed.iter()) {
            self.health.reset(id);
        }
        debug!(
            version = report.version,
            added = ?report.added,
            changed = ?report.changed,
            removed = ?report.removed,
            "Applied configuration reload"
        );
        Ok(report)
    }
}
